//! Probe definitions and the built-in catalog.
//!
//! A probe is a self-contained heuristic check for one framework at one
//! precedence rank. Probe bodies receive the [`Environment`] as their
//! only input and answer with `Ok(true)` (positive evidence), `Ok(false)`
//! (negative evidence) or `Err` (the probe itself failed). The engine
//! treats every probe uniformly; the knowledge of what indicates a given
//! framework lives entirely in the per-framework modules below.

pub mod botasaurus;
pub mod nodriver;
pub mod patchright;
pub mod puppeteer_extra;
pub mod pydoll;
pub mod seleniumbase;
pub mod selenium_driverless;
pub mod zendriver;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Verdict};
use crate::env::Environment;
use crate::executor::ProbeExecutor;

/// Precedence rank, used to resolve disagreement between variants of the
/// same framework. Ordering matters: `Stub < Heuristic < Behavioral`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// Inert placeholder; always-negative by construction.
    Stub,
    /// Property-existence or value check.
    Heuristic,
    /// Deeper check: descriptors, enumeration, sources, stack frames.
    Behavioral,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Stub => "stub",
            Rank::Heuristic => "heuristic",
            Rank::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boxed probe body. Invoked once per run; may suspend on async lookups.
pub type ProbeBody =
    Arc<dyn Fn(Arc<dyn Environment>) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// An immutable, registered heuristic check for one framework.
#[derive(Clone)]
pub struct Probe {
    framework: String,
    variant: String,
    rank: Rank,
    body: ProbeBody,
}

impl Probe {
    /// Build a probe from an async body.
    pub fn new(
        framework: impl Into<String>,
        variant: impl Into<String>,
        rank: Rank,
        body: ProbeBody,
    ) -> Self {
        Self {
            framework: framework.into(),
            variant: variant.into(),
            rank,
            body,
        }
    }

    /// Build a probe from a synchronous check.
    pub fn from_fn<F>(
        framework: impl Into<String>,
        variant: impl Into<String>,
        rank: Rank,
        f: F,
    ) -> Self
    where
        F: Fn(&dyn Environment) -> Result<bool> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(
            framework,
            variant,
            rank,
            Arc::new(move |env| {
                let f = Arc::clone(&f);
                Box::pin(async move { f(env.as_ref()) })
            }),
        )
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// `framework/variant`, for logs and error messages.
    pub fn id(&self) -> String {
        format!("{}/{}", self.framework, self.variant)
    }

    pub(crate) fn invoke(&self, env: Arc<dyn Environment>) -> BoxFuture<'static, Result<bool>> {
        (self.body)(env)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("framework", &self.framework)
            .field("variant", &self.variant)
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}

/// The full built-in catalog, in registration order.
pub fn default_probes() -> Vec<Probe> {
    let mut probes = Vec::new();
    probes.extend(botasaurus::probes());
    probes.extend(nodriver::probes());
    probes.extend(patchright::probes());
    probes.extend(puppeteer_extra::probes());
    probes.extend(pydoll::probes());
    probes.extend(seleniumbase::probes());
    probes.extend(selenium_driverless::probes());
    probes.extend(zendriver::probes());
    probes
}

/// Run one framework's probe set to a verdict, outside any engine run.
/// Backs the per-framework `detect_*` helpers.
pub(crate) async fn detect_with(probes: Vec<Probe>, env: Arc<dyn Environment>) -> Verdict {
    let executor = ProbeExecutor::default();
    let results = executor.run_all(probes.iter(), &env).await;
    aggregate(results)
        .into_iter()
        .next()
        .map(|v| v.verdict)
        .unwrap_or(Verdict::Inconclusive)
}
