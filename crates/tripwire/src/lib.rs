//! Tripwire — detect browser-automation frameworks from captured page state.
//!
//! The engine runs a battery of independently-authored, fallible probes
//! (stub, heuristic and behavioral variants per framework) against a
//! guarded view of a page's globals, descriptors, function sources and
//! stack traces, then reconciles the competing answers into one verdict
//! per framework. A probe that throws, hangs or gets fooled becomes data
//! in the report; it never aborts the run.
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use tripwire::env::{PageSnapshot, SnapshotEnv};
//!
//! # async fn demo() -> Result<(), tripwire::error::EngineError> {
//! let snapshot = PageSnapshot::new().with_global("__zendriver_async__", json!(true));
//! let report = tripwire::run_detection(Arc::new(SnapshotEnv::new(snapshot))).await?;
//! assert_eq!(report.detected(), vec!["zendriver"]);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cli;
pub mod engine;
pub mod env;
pub mod error;
pub mod executor;
pub mod probes;
pub mod registry;
pub mod report;

pub use aggregate::{FrameworkVerdict, Rationale, Verdict};
pub use engine::{run_detection, DetectionEngine};
pub use env::{Environment, PageSnapshot, SnapshotEnv};
pub use error::EngineError;
pub use executor::{Outcome, ProbeExecutor, ProbeResult};
pub use probes::{Probe, Rank};
pub use registry::ProbeRegistry;
pub use report::{ExecutionReport, RunStatus};
