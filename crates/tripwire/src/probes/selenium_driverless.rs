//! Probes for the selenium-driverless automation framework.
//!
//! Only selenium-driverless explicitly unsets `navigator.webdriver`
//! (leaving it an own property with value `false`) while also exposing
//! its unwrapped Selenium bridge at `window.__selenium_unwrapped`. The
//! combination is the signal; either half alone is common noise.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup, Presence};

pub const FRAMEWORK: &str = "seleniumdriverless";

const BRIDGE_GLOBAL: &str = "__selenium_unwrapped";

/// All selenium-driverless probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    let webdriver_unset =
        env.global_value("navigator.webdriver") == Lookup::Found(Value::Bool(false));
    let bridge = env.has_global(BRIDGE_GLOBAL) == Presence::Present;
    Ok(webdriver_unset && bridge)
}

/// Stricter than the heuristic: `webdriver` must be an *own* property
/// explicitly set to `false`, which real browsers never do.
fn behavioral(env: &dyn Environment) -> Result<bool> {
    if env.has_global(BRIDGE_GLOBAL) != Presence::Present {
        return Ok(false);
    }
    match env.property_descriptor("navigator", "webdriver") {
        Lookup::Found(desc) => Ok(desc.value == Some(json!(false))),
        _ => Ok(false),
    }
}

/// Run only the selenium-driverless probes, for ad-hoc invocation.
pub async fn detect_seleniumdriverless(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}
