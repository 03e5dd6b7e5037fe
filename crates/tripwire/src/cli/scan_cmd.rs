//! `tripwire scan <snapshot.json>` — run the probe battery against a
//! captured page snapshot.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::aggregate::Verdict;
use crate::cli::output::{self, Styled};
use crate::engine::DetectionEngine;
use crate::env::{PageSnapshot, SnapshotEnv};
use crate::executor::ProbeExecutor;
use crate::probes::default_probes;
use crate::registry::ProbeRegistry;
use crate::report::log::RunLog;
use crate::report::ExecutionReport;

/// Run the scan command.
pub async fn run(
    snapshot_path: &Path,
    budget_ms: u64,
    framework: Option<&str>,
    log: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path.display()))?;
    let snapshot: PageSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("parsing snapshot {}", snapshot_path.display()))?;

    let probes = default_probes()
        .into_iter()
        .filter(|p| framework.map_or(true, |f| p.framework() == f));
    let registry = ProbeRegistry::with_probes(probes)?;
    if registry.is_empty() {
        bail!("no probes match framework filter");
    }

    let engine = DetectionEngine::with_executor(
        registry,
        ProbeExecutor::with_budget(Duration::from_millis(budget_ms)),
    );
    let report = engine.run(Arc::new(SnapshotEnv::new(snapshot))).await?;

    if log {
        RunLog::default_log()?.append(&report)?;
    }

    if output::is_json() {
        output::print_json(&serde_json::to_value(&report)?);
        return Ok(());
    }

    print_report(&Styled::new(), &report);
    Ok(())
}

/// Print the verdict table in branded format.
fn print_report(s: &Styled, report: &ExecutionReport) {
    if !output::is_quiet() {
        output::print_header(s);
    }

    for verdict in &report.verdicts {
        let (symbol, label) = match verdict.verdict {
            Verdict::Detected => (s.detected_sym(), s.red("detected")),
            Verdict::NotDetected => (s.clear_sym(), s.green("not detected")),
            Verdict::Inconclusive => (s.unknown_sym(), s.yellow("inconclusive")),
        };
        let rationale = verdict
            .rationale
            .as_ref()
            .map(|r| s.dim(&format!("({}, {}ms)", r.variant, r.elapsed_ms)))
            .unwrap_or_default();
        eprintln!("    {symbol} {:<20} {label} {rationale}", verdict.framework);

        if output::is_verbose() {
            for result in &verdict.results {
                let note = result
                    .error
                    .as_deref()
                    .map(|e| format!(" — {e}"))
                    .unwrap_or_default();
                eprintln!(
                    "        {:<12} {:<10} {:>4}ms{note}",
                    result.variant,
                    format!("{:?}", result.outcome).to_lowercase(),
                    result.elapsed_ms,
                );
            }
        }
    }

    let detected = report.detected();
    eprintln!();
    if detected.is_empty() {
        eprintln!("  {}: no automation framework detected", s.bold("Status"));
    } else {
        eprintln!(
            "  {}: {} detected ({})",
            s.bold("Status"),
            detected.len(),
            detected.join(", ")
        );
    }
    eprintln!(
        "  {}",
        // registry hash ties this run to the battery that produced it
        format_args!("run {} battery {}", report.run_id, report.registry_hash)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scan_reads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let snapshot = PageSnapshot::new().with_global("__zendriver_async__", json!(true));
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        run(&path, 50, None, false).await.unwrap();
        run(&path, 50, Some("zendriver"), false).await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_rejects_unknown_framework_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, "{}").unwrap();

        let err = run(&path, 50, Some("no-such-framework"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no probes match"));
    }

    #[tokio::test]
    async fn test_scan_rejects_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(run(&path, 50, None, false).await.is_err());
    }
}
