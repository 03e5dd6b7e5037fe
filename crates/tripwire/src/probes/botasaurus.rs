//! Probes for the Botasaurus automation framework.
//!
//! Botasaurus injects a scrape context for retry/proxy orchestration:
//! `window.__botasaurus_context`, an object.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup, Presence};

pub const FRAMEWORK: &str = "botasaurus";

const CONTEXT_GLOBAL: &str = "__botasaurus_context";

/// All Botasaurus probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.has_global(CONTEXT_GLOBAL) == Presence::Present)
}

/// The marker must actually be the scrape context object, not a decoy
/// primitive planted by an anti-detection layer.
fn behavioral(env: &dyn Environment) -> Result<bool> {
    match env.global_value(CONTEXT_GLOBAL) {
        Lookup::Found(Value::Object(_)) => Ok(true),
        _ => Ok(false),
    }
}

/// Run only the Botasaurus probes, for ad-hoc invocation.
pub async fn detect_botasaurus(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
