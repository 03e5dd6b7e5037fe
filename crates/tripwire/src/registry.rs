//! Append-only probe registry keyed by (framework, variant).
//!
//! Registration order is the execution order, and it is part of the run's
//! identity: the snapshot hash recorded in every report covers the ordered
//! (framework, variant, rank) tuples, so two reports with the same hash
//! ran the same battery. There is no removal — the registry is append-only
//! for the lifetime of a run, which keeps replays deterministic.

use std::hash::{Hash, Hasher};

use fnv::{FnvHashSet, FnvHasher};

use crate::error::EngineError;
use crate::probes::Probe;

#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: Vec<Probe>,
    seen: FnvHashSet<(String, String)>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an iterator of probes, failing on the first
    /// duplicate (framework, variant) pair.
    pub fn with_probes(probes: impl IntoIterator<Item = Probe>) -> Result<Self, EngineError> {
        let mut registry = Self::new();
        for probe in probes {
            registry.register(probe)?;
        }
        Ok(registry)
    }

    /// Register a probe. Fails with [`EngineError::DuplicateVariant`] if
    /// the (framework, variant) pair is already present; the existing
    /// registration is untouched.
    pub fn register(&mut self, probe: Probe) -> Result<(), EngineError> {
        let key = (probe.framework().to_string(), probe.variant().to_string());
        if !self.seen.insert(key) {
            return Err(EngineError::DuplicateVariant {
                framework: probe.framework().to_string(),
                variant: probe.variant().to_string(),
            });
        }
        self.probes.push(probe);
        Ok(())
    }

    /// Registration-order iterator over probes, optionally filtered by
    /// framework. Restartable: call again for a fresh pass.
    pub fn list(&self, framework: Option<&str>) -> impl Iterator<Item = &Probe> + '_ {
        let filter = framework.map(str::to_string);
        self.probes
            .iter()
            .filter(move |p| filter.as_deref().map_or(true, |f| p.framework() == f))
    }

    /// Distinct framework ids, in first-registration order.
    pub fn frameworks(&self) -> Vec<&str> {
        let mut seen = FnvHashSet::default();
        self.probes
            .iter()
            .map(|p| p.framework())
            .filter(|f| seen.insert(*f))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// FNV hash over the ordered (framework, variant, rank) tuples.
    /// Identical batteries produce identical hashes across runs.
    pub fn snapshot_hash(&self) -> String {
        let mut hasher = FnvHasher::default();
        for probe in &self.probes {
            probe.framework().hash(&mut hasher);
            probe.variant().hash(&mut hasher);
            (probe.rank() as u8).hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::Rank;

    fn probe(framework: &str, variant: &str, rank: Rank) -> Probe {
        Probe::from_fn(framework, variant, rank, |_| Ok(false))
    }

    #[test]
    fn test_duplicate_variant_rejected_first_kept() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(probe("nodriver", "heuristic", Rank::Heuristic))
            .unwrap();
        let err = registry
            .register(probe("nodriver", "heuristic", Rank::Behavioral))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateVariant {
                framework: "nodriver".into(),
                variant: "heuristic".into(),
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.list(None).next().unwrap().rank(),
            Rank::Heuristic
        );
    }

    #[test]
    fn test_same_variant_different_framework_ok() {
        let mut registry = ProbeRegistry::new();
        registry.register(probe("nodriver", "stub", Rank::Stub)).unwrap();
        registry.register(probe("pydoll", "stub", Rank::Stub)).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_filtered_and_restartable() {
        let registry = ProbeRegistry::with_probes([
            probe("zendriver", "stub", Rank::Stub),
            probe("pydoll", "stub", Rank::Stub),
            probe("zendriver", "heuristic", Rank::Heuristic),
        ])
        .unwrap();

        let first: Vec<_> = registry
            .list(Some("zendriver"))
            .map(|p| p.variant().to_string())
            .collect();
        assert_eq!(first, vec!["stub", "heuristic"]);

        // restartable: a second pass sees the same sequence
        let second: Vec<_> = registry
            .list(Some("zendriver"))
            .map(|p| p.variant().to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_frameworks_first_registration_order() {
        let registry = ProbeRegistry::with_probes([
            probe("zendriver", "stub", Rank::Stub),
            probe("pydoll", "stub", Rank::Stub),
            probe("zendriver", "heuristic", Rank::Heuristic),
        ])
        .unwrap();
        assert_eq!(registry.frameworks(), vec!["zendriver", "pydoll"]);
    }

    #[test]
    fn test_snapshot_hash_stable_and_order_sensitive() {
        let a = ProbeRegistry::with_probes([
            probe("nodriver", "stub", Rank::Stub),
            probe("pydoll", "stub", Rank::Stub),
        ])
        .unwrap();
        let b = ProbeRegistry::with_probes([
            probe("nodriver", "stub", Rank::Stub),
            probe("pydoll", "stub", Rank::Stub),
        ])
        .unwrap();
        let c = ProbeRegistry::with_probes([
            probe("pydoll", "stub", Rank::Stub),
            probe("nodriver", "stub", Rank::Stub),
        ])
        .unwrap();
        assert_eq!(a.snapshot_hash(), b.snapshot_hash());
        assert_ne!(a.snapshot_hash(), c.snapshot_hash());
    }
}
