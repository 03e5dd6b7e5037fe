//! Detection engine — wires registry, executor, aggregator and reporter.
//!
//! One engine instance admits one run at a time. Probes within a run
//! execute sequentially against the same environment, so a second
//! interleaved run would race them over shared mutable state; reentrant
//! calls fail fast with [`EngineError::AlreadyRunning`] instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::env::Environment;
use crate::error::EngineError;
use crate::executor::ProbeExecutor;
use crate::probes::default_probes;
use crate::registry::ProbeRegistry;
use crate::report::ExecutionReport;

pub struct DetectionEngine {
    registry: ProbeRegistry,
    executor: ProbeExecutor,
    running: AtomicBool,
}

impl DetectionEngine {
    pub fn new(registry: ProbeRegistry) -> Self {
        Self::with_executor(registry, ProbeExecutor::default())
    }

    pub fn with_executor(registry: ProbeRegistry, executor: ProbeExecutor) -> Self {
        Self {
            registry,
            executor,
            running: AtomicBool::new(false),
        }
    }

    /// Engine loaded with the full built-in probe catalog.
    pub fn with_defaults() -> Self {
        let registry = ProbeRegistry::with_probes(default_probes())
            .expect("built-in catalog has unique probe ids");
        Self::new(registry)
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Execute one full detection run against `env`.
    ///
    /// Always yields a complete [`ExecutionReport`] when a run is
    /// admitted — a mis-behaving probe becomes data in the report, never
    /// an `Err`. The only failures surfaced to the caller are run
    /// management ones ([`EngineError::AlreadyRunning`]).
    pub async fn run(&self, env: Arc<dyn Environment>) -> Result<ExecutionReport, EngineError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| EngineError::AlreadyRunning)?;
        let _guard = RunGuard(&self.running);

        let report = ExecutionReport::pending(self.registry.snapshot_hash());

        if self.registry.is_empty() {
            warn!(run_id = %report.run_id, "no probes registered, run cannot start");
            return Ok(report.failed());
        }

        info!(
            run_id = %report.run_id,
            probes = self.registry.len(),
            frameworks = self.registry.frameworks().len(),
            "starting detection run"
        );

        let results = self.executor.run_all(self.registry.list(None), &env).await;
        let verdicts = aggregate(results);
        let report = report.complete(verdicts);

        info!(
            run_id = %report.run_id,
            detected = ?report.detected(),
            "detection run complete"
        );
        Ok(report)
    }
}

/// Clears the in-flight flag on every exit path, including panics in the
/// aggregation code above.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Single stable entry point: run the built-in catalog against `env`.
pub async fn run_detection(env: Arc<dyn Environment>) -> Result<ExecutionReport, EngineError> {
    DetectionEngine::with_defaults().run(env).await
}
