//! `tripwire baseline` — verify the no-false-positives property against
//! an empty page snapshot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::cli::output::{self, Styled};
use crate::engine::DetectionEngine;
use crate::env::{PageSnapshot, SnapshotEnv};
use crate::executor::ProbeExecutor;
use crate::probes::default_probes;
use crate::registry::ProbeRegistry;

/// Run the baseline command. Fails if any probe flags a clean page.
pub async fn run(budget_ms: u64) -> Result<()> {
    let registry = ProbeRegistry::with_probes(default_probes())?;
    let engine = DetectionEngine::with_executor(
        registry,
        ProbeExecutor::with_budget(Duration::from_millis(budget_ms)),
    );
    let env = Arc::new(SnapshotEnv::new(PageSnapshot::new()));
    let report = engine.run(env).await?;

    let detected = report.detected();
    if !detected.is_empty() {
        bail!(
            "clean baseline produced false positives: {}",
            detected.join(", ")
        );
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "baseline": "clean",
            "frameworks": report.verdicts.len(),
            "registry_hash": report.registry_hash,
        }));
        return Ok(());
    }

    let s = Styled::new();
    if !output::is_quiet() {
        output::print_header(&s);
        eprintln!(
            "    {} clean baseline: {} frameworks, no false positives",
            s.clear_sym(),
            report.verdicts.len()
        );
    }
    Ok(())
}
