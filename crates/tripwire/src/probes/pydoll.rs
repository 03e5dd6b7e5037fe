//! Probes for the pydoll automation framework.
//!
//! pydoll intentionally exposes its raw CDP session handle on the page:
//! `window.__pydoll_cdp_session`, an object or a function.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup, Presence};

pub const FRAMEWORK: &str = "pydoll";

const SESSION_GLOBAL: &str = "__pydoll_cdp_session";

/// All pydoll probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.has_global(SESSION_GLOBAL) == Presence::Present)
}

/// The session handle is an object, or a callable whose source we can
/// still read.
fn behavioral(env: &dyn Environment) -> Result<bool> {
    match env.global_value(SESSION_GLOBAL) {
        Lookup::Found(Value::Object(_)) => Ok(true),
        _ => Ok(env.function_source(SESSION_GLOBAL).found().is_some()),
    }
}

/// Run only the pydoll probes, for ad-hoc invocation.
pub async fn detect_pydoll(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
