//! Probes for the zendriver automation framework.
//!
//! zendriver marks its async CDP execution mode explicitly:
//! `window.__zendriver_async__ === true`. nodriver, its ancestor, does
//! not set this flag.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup};

pub const FRAMEWORK: &str = "zendriver";

const ASYNC_GLOBAL: &str = "__zendriver_async__";

/// All zendriver probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

/// The flag must be exactly `true`.
fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.global_value(ASYNC_GLOBAL) == Lookup::Found(Value::Bool(true)))
}

fn behavioral(env: &dyn Environment) -> Result<bool> {
    if let Lookup::Found(desc) = env.property_descriptor("", ASYNC_GLOBAL) {
        if desc.value == Some(json!(true)) {
            return Ok(true);
        }
    }
    heuristic(env)
}

/// Run only the zendriver probes, for ad-hoc invocation.
pub async fn detect_zendriver(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
