//! Probes for the Patchright automation framework.
//!
//! Patchright adds an explicit patched flag that vanilla Playwright never
//! sets: `window.__playwright__patched === true`. Its injected helpers
//! also leave `__playwright`-prefixed frames in stack traces captured
//! inside evaluation scripts.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup};

pub const FRAMEWORK: &str = "patchright";

const PATCHED_GLOBAL: &str = "__playwright__patched";

/// All Patchright probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

/// The flag must exist and be exactly `true`; any other value is noise.
fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.global_value(PATCHED_GLOBAL) == Lookup::Found(Value::Bool(true)))
}

fn behavioral(env: &dyn Environment) -> Result<bool> {
    if let Lookup::Found(desc) = env.property_descriptor("", PATCHED_GLOBAL) {
        if desc.value == Some(json!(true)) {
            return Ok(true);
        }
    }
    if env
        .stack_trace()
        .iter()
        .any(|frame| frame.contains("__playwright"))
    {
        return Ok(true);
    }
    heuristic(env)
}

/// Run only the Patchright probes, for ad-hoc invocation.
pub async fn detect_patchright(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
