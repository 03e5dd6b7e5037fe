//! Probes for the nodriver automation framework.
//!
//! nodriver maintains a DOM↔CDP node mapping inside the page:
//! `window.__cdp_node_id__` plus an injected `NodeIdMapper` object. No
//! other tool exposes this mapping.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use super::{detect_with, Probe, Rank};
use crate::aggregate::Verdict;
use crate::env::{Environment, Lookup, Presence};

pub const FRAMEWORK: &str = "nodriver";

const NODE_ID_GLOBAL: &str = "__cdp_node_id__";
const MAPPER_GLOBAL: &str = "NodeIdMapper";

/// All nodriver probe variants, stub first.
pub fn probes() -> Vec<Probe> {
    vec![
        Probe::from_fn(FRAMEWORK, "stub", Rank::Stub, |_| Ok(false)),
        Probe::from_fn(FRAMEWORK, "heuristic", Rank::Heuristic, heuristic),
        Probe::from_fn(FRAMEWORK, "behavioral", Rank::Behavioral, behavioral),
    ]
}

fn heuristic(env: &dyn Environment) -> Result<bool> {
    Ok(env.has_global(NODE_ID_GLOBAL) == Presence::Present)
}

/// Either marker counts: the id counter in any form, or the mapper as a
/// real object (possibly with its lookup function attached).
fn behavioral(env: &dyn Environment) -> Result<bool> {
    if env.has_global(NODE_ID_GLOBAL) == Presence::Present {
        return Ok(true);
    }
    match env.global_value(MAPPER_GLOBAL) {
        Lookup::Found(Value::Object(_)) => Ok(true),
        _ => Ok(env
            .function_source(&format!("{MAPPER_GLOBAL}.lookup"))
            .found()
            .is_some()),
    }
}

/// Run only the nodriver probes, for ad-hoc invocation.
pub async fn detect_nodriver(env: Arc<dyn Environment>) -> Verdict {
    detect_with(probes(), env).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PageSnapshot, SnapshotEnv};
    use serde_json::json;

    #[test]
    fn test_heuristic_fires_on_node_id_global() {
        let e = SnapshotEnv::new(PageSnapshot::new().with_global(NODE_ID_GLOBAL, json!(41)));
        assert!(heuristic(&e).unwrap());
    }

    #[test]
    fn test_behavioral_accepts_mapper_object() {
        let e = SnapshotEnv::new(
            PageSnapshot::new().with_global(MAPPER_GLOBAL, json!({"nodes": {}})),
        );
        assert!(behavioral(&e).unwrap());
    }

    #[test]
    fn test_behavioral_accepts_mapper_function_source() {
        let e = SnapshotEnv::new(PageSnapshot::new().with_function_source(
            "NodeIdMapper.lookup",
            "function lookup(id) { return nodes[id]; }",
        ));
        assert!(behavioral(&e).unwrap());
    }

    #[test]
    fn test_clean_page_is_negative() {
        let e = SnapshotEnv::new(PageSnapshot::new());
        assert!(!heuristic(&e).unwrap());
        assert!(!behavioral(&e).unwrap());
    }

    #[tokio::test]
    async fn test_detect_nodriver_end_to_end() {
        let e: Arc<dyn Environment> = Arc::new(SnapshotEnv::new(
            PageSnapshot::new().with_global(NODE_ID_GLOBAL, json!(7)),
        ));
        assert_eq!(detect_nodriver(e).await, Verdict::Detected);
    }
}
