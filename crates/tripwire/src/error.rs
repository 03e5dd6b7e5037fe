//! Typed failures for registry and run management.
//!
//! Probe-level failures never appear here: they are absorbed at the
//! executor boundary and recorded as `Error`/`Timeout` outcomes. Only
//! misuse of the engine itself surfaces as an `Err` to the caller.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A probe with this (framework, variant) pair is already registered.
    /// The existing registration is left intact.
    #[error("probe already registered for {framework}/{variant}")]
    DuplicateVariant { framework: String, variant: String },

    /// A detection run is already in flight on this engine instance.
    #[error("a detection run is already in flight")]
    AlreadyRunning,
}
