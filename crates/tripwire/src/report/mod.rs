//! Execution reports — immutable summaries of one detection run.

pub mod log;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{FrameworkVerdict, Verdict};

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run created, probes not yet all accounted for.
    Pending,
    /// Every registered probe produced a result.
    Complete,
    /// The run could not start (empty registry).
    Failed,
}

/// The external-facing result of one detection run.
///
/// Created in `Pending` state when the run starts; the completing
/// transitions consume `self`, so a finished report cannot be edited and
/// repeated access never re-runs probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Hash of the ordered registry contents, for reproducibility checks.
    pub registry_hash: String,
    pub status: RunStatus,
    pub verdicts: Vec<FrameworkVerdict>,
}

impl ExecutionReport {
    pub(crate) fn pending(registry_hash: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            registry_hash,
            status: RunStatus::Pending,
            verdicts: Vec::new(),
        }
    }

    pub(crate) fn complete(mut self, verdicts: Vec<FrameworkVerdict>) -> Self {
        self.verdicts = verdicts;
        self.completed_at = Some(Utc::now());
        self.status = RunStatus::Complete;
        self
    }

    pub(crate) fn failed(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        self.status = RunStatus::Failed;
        self
    }

    /// Verdict for one framework, if it had any registered probe.
    pub fn verdict_for(&self, framework: &str) -> Option<&FrameworkVerdict> {
        self.verdicts.iter().find(|v| v.framework == framework)
    }

    /// Frameworks the run concluded are driving the page.
    pub fn detected(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| v.verdict == Verdict::Detected)
            .map(|v| v.framework.as_str())
            .collect()
    }
}
