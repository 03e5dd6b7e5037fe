//! Snapshot-backed environment — a serde-captured page state.
//!
//! A [`PageSnapshot`] is what an external harness captures from a live
//! page (global value tree, descriptors, function sources, a stack trace)
//! and hands to the engine. Backing the [`Environment`] trait with a
//! plain value makes runs deterministic and lets tests fabricate
//! arbitrary page states, including denied paths that simulate
//! security-policy blocks.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Environment, Lookup, Presence, PropertyDescriptor};

/// Captured introspectable state of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Global object properties, nested values included.
    #[serde(default)]
    pub globals: BTreeMap<String, Value>,
    /// Own-property descriptors, keyed by full dotted path.
    #[serde(default)]
    pub descriptors: BTreeMap<String, PropertyDescriptor>,
    /// `toString()` output for functions, keyed by full dotted path.
    #[serde(default)]
    pub function_sources: BTreeMap<String, String>,
    /// Frames of a stack trace captured at snapshot time.
    #[serde(default)]
    pub stack: Vec<String>,
    /// Paths whose access threw during capture (proxy traps, CSP blocks).
    /// A denied path also denies everything beneath it.
    #[serde(default)]
    pub denied: BTreeSet<String>,
}

impl PageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level global.
    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    /// Record a property descriptor under its full dotted path.
    pub fn with_descriptor(
        mut self,
        path: impl Into<String>,
        descriptor: PropertyDescriptor,
    ) -> Self {
        self.descriptors.insert(path.into(), descriptor);
        self
    }

    /// Record a function source under its full dotted path.
    pub fn with_function_source(
        mut self,
        path: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.function_sources.insert(path.into(), source.into());
        self
    }

    /// Append a stack frame.
    pub fn with_stack_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }

    /// Mark a path (and everything beneath it) as access-denied.
    pub fn with_denied(mut self, path: impl Into<String>) -> Self {
        self.denied.insert(path.into());
        self
    }

    fn is_denied(&self, path: &str) -> bool {
        self.denied.iter().any(|d| {
            path == d || path.starts_with(&format!("{d}."))
        })
    }

    /// Walk a dotted path through the global value tree.
    fn resolve(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.globals.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                // allow numeric indexing into arrays ("plugins.0")
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// [`Environment`] implementation over a [`PageSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotEnv {
    snapshot: PageSnapshot,
}

impl SnapshotEnv {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }
}

impl Environment for SnapshotEnv {
    fn has_global(&self, name: &str) -> Presence {
        if self.snapshot.is_denied(name) {
            return Presence::Unavailable;
        }
        if self.snapshot.globals.contains_key(name) {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    fn global_value(&self, path: &str) -> Lookup<Value> {
        if self.snapshot.is_denied(path) {
            return Lookup::Unavailable;
        }
        match self.snapshot.resolve(path) {
            Some(value) => Lookup::Found(value.clone()),
            None => Lookup::Missing,
        }
    }

    fn property_descriptor(&self, path: &str, name: &str) -> Lookup<PropertyDescriptor> {
        let full = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}.{name}")
        };
        if self.snapshot.is_denied(&full) {
            return Lookup::Unavailable;
        }
        match self.snapshot.descriptors.get(&full) {
            Some(desc) => Lookup::Found(desc.clone()),
            None => Lookup::Missing,
        }
    }

    fn function_source(&self, path: &str) -> Lookup<String> {
        if self.snapshot.is_denied(path) {
            return Lookup::Unavailable;
        }
        match self.snapshot.function_sources.get(path) {
            Some(src) => Lookup::Found(src.clone()),
            None => Lookup::Missing,
        }
    }

    fn stack_trace(&self) -> Vec<String> {
        self.snapshot.stack.clone()
    }

    fn global_keys(&self) -> Vec<String> {
        // BTreeMap keeps enumeration order stable across runs
        self.snapshot.globals.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence_three_valued() {
        let env = SnapshotEnv::new(
            PageSnapshot::new()
                .with_global("__cdp_node_id__", json!(7))
                .with_denied("__selenium_unwrapped"),
        );
        assert_eq!(env.has_global("__cdp_node_id__"), Presence::Present);
        assert_eq!(env.has_global("NodeIdMapper"), Presence::Absent);
        assert_eq!(env.has_global("__selenium_unwrapped"), Presence::Unavailable);
    }

    #[test]
    fn test_nested_path_resolution() {
        let env = SnapshotEnv::new(PageSnapshot::new().with_global(
            "navigator",
            json!({ "webdriver": false, "plugins": ["pdf", "nacl"] }),
        ));
        assert_eq!(
            env.global_value("navigator.webdriver"),
            Lookup::Found(json!(false))
        );
        assert_eq!(
            env.global_value("navigator.plugins.1"),
            Lookup::Found(json!("nacl"))
        );
        assert_eq!(env.global_value("navigator.vendor"), Lookup::Missing);
    }

    #[test]
    fn test_denied_prefix_covers_children() {
        let env = SnapshotEnv::new(
            PageSnapshot::new()
                .with_global("chrome", json!({ "runtime": {} }))
                .with_denied("chrome"),
        );
        assert!(env.global_value("chrome.runtime").is_unavailable());
        assert_eq!(env.has_global("chrome"), Presence::Unavailable);
        // a sibling is unaffected
        assert_eq!(env.global_value("chromeos"), Lookup::Missing);
    }

    #[test]
    fn test_descriptor_lookup() {
        let env = SnapshotEnv::new(PageSnapshot::new().with_descriptor(
            "navigator.webdriver",
            PropertyDescriptor {
                value: Some(json!(false)),
                configurable: true,
                ..Default::default()
            },
        ));
        let desc = env
            .property_descriptor("navigator", "webdriver")
            .found()
            .unwrap();
        assert_eq!(desc.value, Some(json!(false)));
        assert!(desc.configurable);
        assert_eq!(
            env.property_descriptor("navigator", "vendor"),
            Lookup::Missing
        );
    }

    #[test]
    fn test_root_descriptor_path() {
        let env = SnapshotEnv::new(PageSnapshot::new().with_descriptor(
            "__playwright__patched",
            PropertyDescriptor {
                value: Some(json!(true)),
                ..Default::default()
            },
        ));
        assert!(env.property_descriptor("", "__playwright__patched").found().is_some());
    }

    #[test]
    fn test_global_keys_stable_order() {
        let env = SnapshotEnv::new(
            PageSnapshot::new()
                .with_global("zeta", json!(1))
                .with_global("alpha", json!(2)),
        );
        assert_eq!(env.global_keys(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let snap = PageSnapshot::new()
            .with_global("_seleniumbase", json!({}))
            .with_function_source("NodeIdMapper.lookup", "function lookup(){}")
            .with_stack_frame("at __puppeteer_evaluation_script__:1:1");
        let text = serde_json::to_string(&snap).unwrap();
        let back: PageSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.globals.len(), 1);
        assert_eq!(back.function_sources.len(), 1);
        assert_eq!(back.stack.len(), 1);
    }
}
