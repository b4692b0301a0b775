//! Detector execution engine with parallel support
//!
//! The DetectorEngine orchestrates the execution of all registered detectors:
//! - Runs independent detectors in parallel using rayon, each against its
//!   own flag accumulator
//! - Merges those accumulators in registration order
//! - Runs dependent detectors sequentially against the merged flags
//! - Reports progress through callbacks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    DetectorEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Register detectors                                  │
//! │  2. Partition into independent/dependent                │
//! │  3. Run independent in parallel (rayon)                 │
//! │  4. Merge flags in registration order                   │
//! │  5. Run dependent sequentially with merged flags        │
//! │  6. Collect findings, flags and summary                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Because every detector sees the same read-only graph and writes only to
//! its own accumulator, parallel and sequential runs produce identical output.

use crate::detectors::base::{
    DetectionContext, DetectionSummary, Detector, DetectorResult, ProgressCallback,
};
use crate::detectors::flags::FraudFlags;
use crate::models::{Findings, OutlierStats};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Everything one detection run produced
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    /// Findings grouped by detector kind
    pub findings: Findings,
    /// Sample statistics from the outlier detector, if it ran
    pub outlier_stats: OutlierStats,
    /// Merged flags of every detector
    pub flags: FraudFlags,
    /// Per-detector results in execution order
    pub results: Vec<DetectorResult>,
    pub summary: DetectionSummary,
}

/// Orchestrates fraud detection across all registered detectors
pub struct DetectorEngine {
    /// Registered detectors
    detectors: Vec<Arc<dyn Detector>>,
    /// Number of worker threads for parallel execution
    workers: usize,
    /// Run independent detectors on the rayon pool
    parallel: bool,
    /// Progress callback for reporting execution status
    progress_callback: Option<ProgressCallback>,
}

impl DetectorEngine {
    /// Create a new detector engine
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            detectors: Vec::new(),
            workers: actual_workers,
            parallel: true,
            progress_callback: None,
        }
    }

    /// Toggle parallel execution of independent detectors
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set a progress callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Register a detector
    ///
    /// Detectors are partitioned into independent and dependent sets
    /// based on their `is_dependent()` method.
    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        debug!("Registering detector: {}", detector.name());
        self.detectors.push(detector);
    }

    /// Register multiple detectors at once
    pub fn register_all(&mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) {
        for detector in detectors {
            self.register(detector);
        }
    }

    /// Get the number of registered detectors
    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    /// Get names of all registered detectors
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run all detectors against one graph snapshot
    pub fn run(&self, ctx: &DetectionContext<'_>) -> Result<DetectionOutcome> {
        let start = Instant::now();
        info!(
            "Starting detection with {} detectors on {} workers",
            self.detectors.len(),
            if self.parallel { self.workers } else { 1 }
        );

        let (independent, dependent): (Vec<_>, Vec<_>) = self
            .detectors
            .iter()
            .cloned()
            .partition(|d| !d.is_dependent());

        debug!(
            "Detectors: {} independent, {} dependent",
            independent.len(),
            dependent.len()
        );

        let completed = AtomicUsize::new(0);
        let total = self.detectors.len();
        let tick = |name: &str| {
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(ref callback) = self.progress_callback {
                callback(name, done, total);
            }
        };

        // Collected in registration order either way
        let independent_results: Vec<DetectorResult> = if self.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()?;
            pool.install(|| {
                independent
                    .par_iter()
                    .map(|detector| {
                        let result = self.run_single_detector(detector, ctx);
                        tick(detector.name());
                        result
                    })
                    .collect()
            })
        } else {
            independent
                .iter()
                .map(|detector| {
                    let result = self.run_single_detector(detector, ctx);
                    tick(detector.name());
                    result
                })
                .collect()
        };

        let mut outcome = DetectionOutcome::default();
        for result in independent_results {
            outcome.absorb(result);
        }

        if !dependent.is_empty() {
            let prior = outcome.flags.clone();
            let dependent_ctx = ctx.with_prior_flags(&prior);
            for detector in dependent {
                let result = self.run_single_detector(&detector, &dependent_ctx);
                tick(detector.name());
                outcome.absorb(result);
            }
        }

        outcome.summary.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Detection complete: {} findings, {} flagged entities from {}/{} detectors in {:?}",
            outcome.findings.total(),
            outcome.flags.len(),
            outcome.summary.detectors_succeeded,
            outcome.summary.detectors_run,
            start.elapsed()
        );

        Ok(outcome)
    }

    /// Run a single detector with panic isolation and timing
    fn run_single_detector(
        &self,
        detector: &Arc<dyn Detector>,
        ctx: &DetectionContext<'_>,
    ) -> DetectorResult {
        let name = detector.name().to_string();
        let start = Instant::now();

        debug!("Running detector: {}", name);

        let detect_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut flags = FraudFlags::new();
            let output = detector.detect(ctx, &mut flags);
            (output, flags)
        }));

        let duration = start.elapsed().as_millis() as u64;
        match detect_result {
            Ok((output, flags)) => {
                debug!(
                    "Detector {} found {} findings, flagged {} entities in {}ms",
                    name,
                    output.len(),
                    flags.len(),
                    duration
                );
                DetectorResult::success(name, output, flags, duration)
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("Detector {} panicked: {}", name, panic_msg);
                DetectorResult::failure(name, format!("Panic: {}", panic_msg), duration)
            }
        }
    }
}

impl DetectionOutcome {
    fn absorb(&mut self, result: DetectorResult) {
        self.summary.add_result(&result);
        if !result.is_success() {
            warn!(
                "Detector {} failed: {}",
                result.detector_name,
                result.error.as_deref().unwrap_or("no output")
            );
        }
        if let Some(output) = &result.output {
            if let Some(stats) = output.clone().merge_into(&mut self.findings) {
                self.outlier_stats = stats;
            }
            self.flags.merge(result.flags.clone());
        }
        self.results.push(result);
    }
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Builder for DetectorEngine with fluent API
pub struct DetectorEngineBuilder {
    workers: usize,
    parallel: bool,
    detectors: Vec<Arc<dyn Detector>>,
    progress_callback: Option<ProgressCallback>,
}

impl DetectorEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            workers: 0,
            parallel: true,
            detectors: Vec::new(),
            progress_callback: None,
        }
    }

    /// Set number of worker threads
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Run independent detectors in parallel (default: true)
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Add a detector
    pub fn detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Add multiple detectors
    pub fn detectors(mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) -> Self {
        self.detectors.extend(detectors);
        self
    }

    /// Set progress callback
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Build the engine
    pub fn build(self) -> DetectorEngine {
        let mut engine = DetectorEngine::new(self.workers).with_parallel(self.parallel);

        if let Some(callback) = self.progress_callback {
            engine = engine.with_progress_callback(callback);
        }

        engine.register_all(self.detectors);
        engine
    }
}

impl Default for DetectorEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
