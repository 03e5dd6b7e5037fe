//! `tripwire probes` — list the built-in probe catalog.

use anyhow::Result;

use crate::cli::output::{self, Styled};
use crate::engine::DetectionEngine;

/// Run the probes command.
pub fn run() -> Result<()> {
    let engine = DetectionEngine::with_defaults();
    let registry = engine.registry();

    if output::is_json() {
        let probes: Vec<serde_json::Value> = registry
            .list(None)
            .map(|p| {
                serde_json::json!({
                    "framework": p.framework(),
                    "variant": p.variant(),
                    "rank": p.rank().as_str(),
                })
            })
            .collect();
        output::print_json(&serde_json::json!({
            "probes": probes,
            "registry_hash": registry.snapshot_hash(),
        }));
        return Ok(());
    }

    let s = Styled::new();
    output::print_header(&s);

    for framework in registry.frameworks() {
        eprintln!("  {}", s.bold(framework));
        for probe in registry.list(Some(framework)) {
            eprintln!(
                "    {:<12} {}",
                probe.rank().as_str(),
                s.dim(probe.variant())
            );
        }
    }

    eprintln!();
    eprintln!(
        "  {} probes across {} frameworks, battery {}",
        registry.len(),
        registry.frameworks().len(),
        registry.snapshot_hash()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probes_listing_succeeds() {
        run().unwrap();
    }
}
