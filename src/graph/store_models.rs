use serde::{Deserialize, Serialize};

/// Node types in the claim graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Accident,
    Car,
    Lawyer,
    Doctor,
    Participant,
    Witness,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Accident => "Accident",
            NodeKind::Car => "Car",
            NodeKind::Lawyer => "Lawyer",
            NodeKind::Doctor => "Doctor",
            NodeKind::Participant => "Participant",
            NodeKind::Witness => "Witness",
            NodeKind::Other(s) => s,
        }
    }

    /// Doctors and lawyers
    pub fn is_professional(&self) -> bool {
        matches!(self, NodeKind::Doctor | NodeKind::Lawyer)
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Accident" => NodeKind::Accident,
            "Car" => NodeKind::Car,
            "Lawyer" => NodeKind::Lawyer,
            "Doctor" => NodeKind::Doctor,
            "Participant" => NodeKind::Participant,
            "Witness" => NodeKind::Witness,
            _ => NodeKind::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    Involves,
    Drives,
    IsPassenger,
    Represents,
    Heals,
    Witnesses,
    Other(String),
}

impl EdgeKind {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeKind::Involves => "involves",
            EdgeKind::Drives => "drives",
            EdgeKind::IsPassenger => "isPassenger",
            EdgeKind::Represents => "represents",
            EdgeKind::Heals => "heals",
            EdgeKind::Witnesses => "witnesses",
            EdgeKind::Other(s) => s,
        }
    }

    /// Edges that tie a person to a vehicle
    pub fn is_vehicle_occupancy(&self) -> bool {
        matches!(self, EdgeKind::Drives | EdgeKind::IsPassenger)
    }

    /// Edges from a doctor or lawyer to a client
    pub fn is_client_service(&self) -> bool {
        matches!(self, EdgeKind::Heals | EdgeKind::Represents)
    }
}

impl From<String> for EdgeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "involves" => EdgeKind::Involves,
            "drives" => EdgeKind::Drives,
            "isPassenger" => EdgeKind::IsPassenger,
            "represents" => EdgeKind::Represents,
            "heals" => EdgeKind::Heals,
            "witnesses" => EdgeKind::Witnesses,
            _ => EdgeKind::Other(s),
        }
    }
}

impl From<EdgeKind> for String {
    fn from(kind: EdgeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Person record carried by Participant, Witness, Doctor and Lawyer nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub name: String,
    /// Comma-joined role set, e.g. `"Driver,Witness"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Enrollment dates as recorded, one per accident
    #[serde(default)]
    pub enter: Vec<String>,
}

impl PersonInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            enter: Vec::new(),
        }
    }

    /// Individual role tokens, trimmed, empty tokens dropped
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// Typed node payload, resolved once when the graph is built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeInfo {
    Person(PersonInfo),
    /// Free-form value such as a license plate
    Label(String),
    #[default]
    Missing,
}

/// A node in the claim graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub info: NodeInfo,
}

impl ClaimNode {
    pub fn new(id: &str, kind: NodeKind, info: NodeInfo) -> Self {
        Self {
            id: id.to_string(),
            kind,
            info,
        }
    }

    pub fn person(id: &str, kind: NodeKind, name: &str) -> Self {
        Self::new(id, kind, NodeInfo::Person(PersonInfo::new(name)))
    }

    pub fn participant(id: &str, name: &str) -> Self {
        Self::person(id, NodeKind::Participant, name)
    }

    pub fn witness(id: &str, name: &str) -> Self {
        Self::person(id, NodeKind::Witness, name)
    }

    pub fn car(id: &str, plate: &str) -> Self {
        Self::new(id, NodeKind::Car, NodeInfo::Label(plate.to_string()))
    }

    pub fn accident(id: &str) -> Self {
        Self::new(id, NodeKind::Accident, NodeInfo::Missing)
    }

    pub fn with_role(mut self, role: &str) -> Self {
        if let NodeInfo::Person(p) = &mut self.info {
            p.role = Some(role.to_string());
        }
        self
    }

    pub fn with_dates(mut self, dates: &[&str]) -> Self {
        if let NodeInfo::Person(p) = &mut self.info {
            p.enter.extend(dates.iter().map(|d| d.to_string()));
        }
        self
    }

    pub fn person_info(&self) -> Option<&PersonInfo> {
        match &self.info {
            NodeInfo::Person(p) => Some(p),
            _ => None,
        }
    }

    /// Person name, if this node carries a person record
    pub fn name(&self) -> Option<&str> {
        self.person_info().map(|p| p.name.as_str())
    }

    /// Plate of a Car node
    pub fn plate(&self) -> Option<&str> {
        match (&self.kind, &self.info) {
            (NodeKind::Car, NodeInfo::Label(plate)) => Some(plate),
            _ => None,
        }
    }

    /// Display label: the person name, else the free-form info, else empty
    pub fn label(&self) -> &str {
        match &self.info {
            NodeInfo::Person(p) => &p.name,
            NodeInfo::Label(s) => s,
            NodeInfo::Missing => "",
        }
    }
}

/// A directed, typed relationship between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl ClaimEdge {
    pub fn new(from: &str, to: &str, kind: EdgeKind) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        }
    }
}
