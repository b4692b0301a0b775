//! Per-entity indicator aggregation
//!
//! `FraudFlags` accumulates, per entity name, the labels of every detector
//! that fired against it. Labels are appended as raised, so a detector that
//! matches the same entity twice records its label twice; every reporting
//! view deduplicates. The map only grows during a run.
//!
//! Each independent detector writes into its own accumulator; the engine
//! merges them in registration order.

use crate::models::{FlagLabel, Lead};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FraudFlags {
    entries: IndexMap<String, Vec<FlagLabel>>,
}

impl FraudFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `label` against `entity`
    pub fn raise(&mut self, entity: &str, label: FlagLabel) {
        match self.entries.get_mut(entity) {
            Some(labels) => labels.push(label),
            None => {
                self.entries.insert(entity.to_string(), vec![label]);
            }
        }
    }

    /// Append every record of `other`, keeping its order
    pub fn merge(&mut self, other: FraudFlags) {
        for (entity, labels) in other.entries {
            self.entries.entry(entity).or_default().extend(labels);
        }
    }

    /// Number of flagged entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entries.contains_key(entity)
    }

    pub fn has(&self, entity: &str, label: FlagLabel) -> bool {
        self.raw(entity).contains(&label)
    }

    /// Labels exactly as raised, duplicates included
    pub fn raw(&self, entity: &str) -> &[FlagLabel] {
        self.entries.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct labels in first-raised order
    pub fn distinct(&self, entity: &str) -> Vec<FlagLabel> {
        dedup(self.raw(entity))
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every entity ordered by distinct indicator count, highest first.
    /// Ties keep first-flagged order.
    pub fn ranked(&self) -> Vec<Lead> {
        let mut leads: Vec<Lead> = self
            .entries
            .iter()
            .map(|(name, labels)| {
                let indicators = dedup(labels);
                Lead {
                    name: name.clone(),
                    indicator_count: indicators.len(),
                    indicators,
                }
            })
            .collect();
        leads.sort_by(|a, b| b.indicator_count.cmp(&a.indicator_count));
        leads
    }

    /// Ranked entities with at least `min_indicators` distinct labels
    pub fn leads(&self, min_indicators: usize) -> Vec<Lead> {
        self.ranked()
            .into_iter()
            .filter(|l| l.indicator_count >= min_indicators)
            .collect()
    }

    /// Deduplicated view for the output document
    pub fn to_report(&self) -> IndexMap<String, Vec<FlagLabel>> {
        self.entries
            .iter()
            .map(|(name, labels)| (name.clone(), dedup(labels)))
            .collect()
    }
}

fn dedup(labels: &[FlagLabel]) -> Vec<FlagLabel> {
    let mut out: Vec<FlagLabel> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(label) {
            out.push(*label);
        }
    }
    out
}
