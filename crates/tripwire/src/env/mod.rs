//! Guarded read access to introspectable page state.
//!
//! Probes never touch page state directly. They go through an
//! [`Environment`], which converts every underlying failure (revoked
//! property, security-policy denial, proxied global that throws on
//! access) into an explicit [`Presence::Unavailable`] / [`Lookup::Unavailable`]
//! answer instead of raising. This keeps the fault boundary in one place
//! and lets probe authors write straight-line checks.

pub mod snapshot;

pub use snapshot::{PageSnapshot, SnapshotEnv};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Three-valued answer to "does this global exist?".
///
/// `Absent` is confirmed absence; `Unavailable` means the question could
/// not be answered. Probes must not treat the two as equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Absent,
    Unavailable,
}

/// Result of a guarded value lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The value was read successfully.
    Found(T),
    /// The path resolves to nothing; confirmed absent.
    Missing,
    /// Access was blocked; no conclusion possible.
    Unavailable,
}

impl<T> Lookup<T> {
    /// Convert to `Option`, discarding the missing/unavailable distinction.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Lookup::Unavailable)
    }
}

/// Snapshot of an `Object.getOwnPropertyDescriptor` answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub enumerable: bool,
    #[serde(default)]
    pub configurable: bool,
    /// The property is backed by an accessor pair rather than a data slot.
    #[serde(default)]
    pub has_getter: bool,
}

/// Read-only, guarded view of a page's introspectable state.
///
/// Implementations must never panic, never return `Err`, and never mutate
/// host state as a side effect of being queried. Paths are dotted
/// (`"navigator.webdriver"`); an empty path means the global object itself.
pub trait Environment: Send + Sync {
    /// Whether a name exists on the global object.
    fn has_global(&self, name: &str) -> Presence;

    /// Value at a dotted path from the global object.
    fn global_value(&self, path: &str) -> Lookup<Value>;

    /// Own-property descriptor for `name` on the object at `path`.
    fn property_descriptor(&self, path: &str, name: &str) -> Lookup<PropertyDescriptor>;

    /// Source text of the function at `path`, as `Function.prototype.toString`
    /// would report it.
    fn function_source(&self, path: &str) -> Lookup<String>;

    /// Frames of a stack trace captured inside the page context.
    fn stack_trace(&self) -> Vec<String>;

    /// Enumerable keys of the global object, in a stable order.
    fn global_keys(&self) -> Vec<String>;
}
