//! Probes for the SeleniumBase automation framework.
//!
//! SeleniumBase injects a branding namespace for its test utilities:
//! `window._seleniumbase`, an object.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup, Presence};

pub const FRAMEWORK: &str = "seleniumbase";

const NAMESPACE_GLOBAL: &str = "_seleniumbase";

/// All SeleniumBase probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.has_global(NAMESPACE_GLOBAL) == Presence::Present)
}

/// The namespace must be a real object, not just any truthy value.
fn behavioral(env: &dyn Environment) -> Result<bool> {
    match env.global_value(NAMESPACE_GLOBAL) {
        Lookup::Found(Value::Object(_)) => Ok(true),
        _ => Ok(false),
    }
}

/// Run only the SeleniumBase probes, for ad-hoc invocation.
pub async fn detect_seleniumbase(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PageSnapshot, SnapshotEnv};
    use serde_json::json;

    #[test]
    fn test_heuristic_fires_on_namespace() {
        let e = SnapshotEnv::new(
            PageSnapshot::new().with_global(NAMESPACE_GLOBAL, json!({"version": "4"})),
        );
        assert!(heuristic(&e).unwrap());
        assert!(!heuristic(&SnapshotEnv::new(PageSnapshot::new())).unwrap());
    }

    #[test]
    fn test_behavioral_requires_object() {
        let object = SnapshotEnv::new(
            PageSnapshot::new().with_global(NAMESPACE_GLOBAL, json!({})),
        );
        let number = SnapshotEnv::new(
            PageSnapshot::new().with_global(NAMESPACE_GLOBAL, json!(1)),
        );
        assert!(behavioral(&object).unwrap());
        assert!(!behavioral(&number).unwrap());
    }

    #[tokio::test]
    async fn test_detect_seleniumbase_end_to_end() {
        let e: Arc<dyn Environment> = Arc::new(SnapshotEnv::new(
            PageSnapshot::new().with_global(NAMESPACE_GLOBAL, json!({})),
        ));
        assert_eq!(detect_seleniumbase(e).await, Verdict::Detected);
    }
}
