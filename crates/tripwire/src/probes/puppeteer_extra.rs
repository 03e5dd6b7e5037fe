//! Probes for the puppeteer-extra automation framework.
//!
//! puppeteer-extra plugins register themselves on the global object with
//! `__puppeteer_extra_plugin_`-prefixed names, and the stealth plugin
//! additionally fakes a non-empty `navigator.plugins` list.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup};

pub const FRAMEWORK: &str = "puppeteerextra";

const PLUGIN_PREFIX: &str = "__puppeteer_extra_plugin_";

/// All puppeteer-extra probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn has_plugin_marker(env: &dyn Environment) -> bool {
    env.global_keys()
        .iter()
        .any(|key| key.starts_with(PLUGIN_PREFIX))
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(has_plugin_marker(env))
}

/// Plugin marker plus the faked plugin list — the combination is what
/// separates puppeteer-extra from a page that merely defines an odd
/// global.
fn behavioral(env: &dyn Environment) -> Result<bool> {
    if !has_plugin_marker(env) {
        return Ok(false);
    }
    let plugins_populated = match env.global_value("navigator.plugins") {
        Lookup::Found(Value::Array(items)) => !items.is_empty(),
        _ => false,
    };
    Ok(plugins_populated)
}

/// Run only the puppeteer-extra probes, for ad-hoc invocation.
pub async fn detect_puppeteerextra(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
