//! Fault-bounded, budgeted execution of registered probes.
//!
//! Probes run one at a time, in registration order, never in parallel —
//! sequential execution is what guarantees each probe a consistent view
//! of shared state for the duration of its own invocation. A panicking
//! probe becomes an `Error` result; a probe that outlives its wall-clock
//! budget becomes a `Timeout` and the remaining probes still run. When a
//! probe times out its future is dropped, but side effects it already
//! performed remain — reordering probes across runs without accounting
//! for that is a known contamination risk.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::env::Environment;
use crate::probes::{Probe, Rank};

/// Default per-probe wall-clock budget.
pub const DEFAULT_PROBE_BUDGET: Duration = Duration::from_millis(50);

/// Error descriptions are truncated to keep results bounded even when a
/// probe throws something enormous.
const MAX_ERROR_LEN: usize = 200;

/// Typed outcome of a single probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Positive,
    Negative,
    Error,
    Timeout,
}

impl Outcome {
    /// Whether the probe executed to completion without failing.
    pub fn is_conclusive(&self) -> bool {
        matches!(self, Outcome::Positive | Outcome::Negative)
    }
}

/// One probe's result for one run. Created here, never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub framework: String,
    pub variant: String,
    pub rank: Rank,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Wall-clock budget per probe invocation.
    pub probe_budget: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            probe_budget: DEFAULT_PROBE_BUDGET,
        }
    }
}

/// Runs probes through the fault boundary and coerces their answers into
/// typed [`ProbeResult`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeExecutor {
    config: ExecutorConfig,
}

impl ProbeExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self {
            config: ExecutorConfig {
                probe_budget: budget,
            },
        }
    }

    /// Run every probe in iteration order. Each registered probe yields
    /// exactly one result; nothing is skipped silently.
    pub async fn run_all<'a>(
        &self,
        probes: impl Iterator<Item = &'a Probe>,
        env: &Arc<dyn Environment>,
    ) -> Vec<ProbeResult> {
        let mut results = Vec::new();
        for probe in probes {
            results.push(self.run_one(probe, Arc::clone(env)).await);
        }
        results
    }

    /// Invoke one probe through the fault boundary.
    pub async fn run_one(&self, probe: &Probe, env: Arc<dyn Environment>) -> ProbeResult {
        let started = Instant::now();
        let guarded = AssertUnwindSafe(probe.invoke(env)).catch_unwind();

        let (outcome, error) = match tokio::time::timeout(self.config.probe_budget, guarded).await
        {
            Err(_) => {
                warn!(probe = %probe.id(), budget_ms = self.config.probe_budget.as_millis() as u64,
                    "probe exceeded its budget");
                (Outcome::Timeout, None)
            }
            Ok(Err(panic)) => {
                let msg = truncate(&panic_message(panic.as_ref()));
                warn!(probe = %probe.id(), error = %msg, "probe panicked");
                (Outcome::Error, Some(msg))
            }
            Ok(Ok(Err(err))) => {
                let msg = truncate(&format!("{err:#}"));
                warn!(probe = %probe.id(), error = %msg, "probe failed");
                (Outcome::Error, Some(msg))
            }
            Ok(Ok(Ok(true))) => (Outcome::Positive, None),
            Ok(Ok(Ok(false))) => (Outcome::Negative, None),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(probe = %probe.id(), ?outcome, elapsed_ms, "probe finished");

        ProbeResult {
            framework: probe.framework().to_string(),
            variant: probe.variant().to_string(),
            rank: probe.rank(),
            outcome,
            error,
            elapsed_ms,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe panicked".to_string()
    }
}

fn truncate(msg: &str) -> String {
    if msg.len() <= MAX_ERROR_LEN {
        return msg.to_string();
    }
    let mut end = MAX_ERROR_LEN;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &msg[..end])
}
