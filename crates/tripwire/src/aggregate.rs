//! Collapse per-probe results into one verdict per framework.
//!
//! Only the highest precedence rank present for a framework decides the
//! verdict; lower-rank results are kept for audit but can never override
//! it. An always-negative stub cannot mask a behavioral positive, and a
//! behavioral negative cannot be outvoted by an over-eager stub. Within
//! the deciding rank any positive wins — false negatives are costlier
//! than false positives for a detector.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::executor::{Outcome, ProbeResult};

/// Reconciled conclusion for one framework in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Detected,
    NotDetected,
    Inconclusive,
}

/// Which result decided the verdict, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rationale {
    pub variant: String,
    pub elapsed_ms: u64,
    pub note: String,
}

/// One framework's aggregated verdict plus its audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkVerdict {
    pub framework: String,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<Rationale>,
    /// All contributing results, ordered by rank (highest first), then
    /// by execution order within a rank.
    pub results: Vec<ProbeResult>,
}

/// Group results by framework (first-appearance order) and resolve each
/// group to a verdict.
pub fn aggregate(results: Vec<ProbeResult>) -> Vec<FrameworkVerdict> {
    let mut groups: Vec<(String, Vec<ProbeResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(fw, _)| *fw == result.framework) {
            Some((_, group)) => group.push(result),
            None => groups.push((result.framework.clone(), vec![result])),
        }
    }

    groups
        .into_iter()
        .map(|(framework, group)| resolve(framework, group))
        .collect()
}

fn resolve(framework: String, mut results: Vec<ProbeResult>) -> FrameworkVerdict {
    // stable sort: execution order survives within each rank
    results.sort_by_key(|r| std::cmp::Reverse(r.rank));

    let top_rank = results[0].rank;
    let top: Vec<&ProbeResult> = results.iter().filter(|r| r.rank == top_rank).collect();

    let (verdict, deciding) = if let Some(positive) =
        top.iter().find(|r| r.outcome == Outcome::Positive)
    {
        (Verdict::Detected, Some((*positive, "reported positive")))
    } else if !top.is_empty() && top.iter().all(|r| r.outcome == Outcome::Negative) {
        // proof of absence needs every top-rank probe to answer negative;
        // errors and timeouts are not negative evidence
        (
            Verdict::NotDetected,
            Some((top[0], "all probes at the deciding rank reported negative")),
        )
    } else {
        let failed = top.iter().find(|r| !r.outcome.is_conclusive());
        (
            Verdict::Inconclusive,
            failed.map(|r| (*r, "no conclusive result at the deciding rank")),
        )
    };

    let rationale = deciding.map(|(result, note)| Rationale {
        variant: result.variant.clone(),
        elapsed_ms: result.elapsed_ms,
        note: format!("{} probe {}", result.rank, note),
    });

    debug!(framework = %framework, ?verdict, rank = %top_rank, "resolved verdict");

    FrameworkVerdict {
        framework,
        verdict,
        rationale,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::Rank;

    fn result(framework: &str, variant: &str, rank: Rank, outcome: Outcome) -> ProbeResult {
        ProbeResult {
            framework: framework.into(),
            variant: variant.into(),
            rank,
            outcome,
            error: None,
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_behavioral_positive_beats_stub_negative() {
        let verdicts = aggregate(vec![
            result("patchright", "stub", Rank::Stub, Outcome::Negative),
            result("patchright", "behavioral", Rank::Behavioral, Outcome::Positive),
        ]);
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].verdict, Verdict::Detected);
        assert_eq!(
            verdicts[0].rationale.as_ref().unwrap().variant,
            "behavioral"
        );
    }

    #[test]
    fn test_stub_negative_cannot_mask_heuristic_positive() {
        let verdicts = aggregate(vec![
            result("zendriver", "heuristic", Rank::Heuristic, Outcome::Positive),
            result("zendriver", "stub", Rank::Stub, Outcome::Negative),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::Detected);
        assert_eq!(verdicts[0].rationale.as_ref().unwrap().variant, "heuristic");
    }

    #[test]
    fn test_top_rank_negative_overrides_lower_positive() {
        // a lower rank's positive never outranks the deciding rank
        let verdicts = aggregate(vec![
            result("pydoll", "stub", Rank::Stub, Outcome::Positive),
            result("pydoll", "behavioral", Rank::Behavioral, Outcome::Negative),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::NotDetected);
    }

    #[test]
    fn test_all_top_rank_negative_is_not_detected() {
        let verdicts = aggregate(vec![
            result("nodriver", "stub", Rank::Stub, Outcome::Negative),
            result("nodriver", "heuristic", Rank::Heuristic, Outcome::Negative),
            result("nodriver", "behavioral", Rank::Behavioral, Outcome::Negative),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::NotDetected);
    }

    #[test]
    fn test_error_at_top_rank_is_inconclusive() {
        // an error is not negative evidence, so absence is unproven
        let verdicts = aggregate(vec![
            result("botasaurus", "heuristic", Rank::Heuristic, Outcome::Negative),
            result("botasaurus", "behavioral", Rank::Behavioral, Outcome::Error),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::Inconclusive);
    }

    #[test]
    fn test_timeout_at_top_rank_is_inconclusive() {
        let verdicts = aggregate(vec![result(
            "seleniumbase",
            "behavioral",
            Rank::Behavioral,
            Outcome::Timeout,
        )]);
        assert_eq!(verdicts[0].verdict, Verdict::Inconclusive);
        let rationale = verdicts[0].rationale.as_ref().unwrap();
        assert_eq!(rationale.variant, "behavioral");
    }

    #[test]
    fn test_positive_wins_tie_within_rank() {
        let verdicts = aggregate(vec![
            result("puppeteerextra", "heuristic-a", Rank::Heuristic, Outcome::Negative),
            result("puppeteerextra", "heuristic-b", Rank::Heuristic, Outcome::Positive),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::Detected);
        assert_eq!(
            verdicts[0].rationale.as_ref().unwrap().variant,
            "heuristic-b"
        );
    }

    #[test]
    fn test_positive_at_top_rank_tolerates_sibling_error() {
        let verdicts = aggregate(vec![
            result("zendriver", "behavioral-a", Rank::Behavioral, Outcome::Error),
            result("zendriver", "behavioral-b", Rank::Behavioral, Outcome::Positive),
        ]);
        assert_eq!(verdicts[0].verdict, Verdict::Detected);
    }

    #[test]
    fn test_results_ordered_by_rank_then_execution() {
        let verdicts = aggregate(vec![
            result("fw", "stub", Rank::Stub, Outcome::Negative),
            result("fw", "heuristic", Rank::Heuristic, Outcome::Negative),
            result("fw", "behavioral-a", Rank::Behavioral, Outcome::Negative),
            result("fw", "behavioral-b", Rank::Behavioral, Outcome::Negative),
        ]);
        let variants: Vec<&str> = verdicts[0]
            .results
            .iter()
            .map(|r| r.variant.as_str())
            .collect();
        assert_eq!(
            variants,
            vec!["behavioral-a", "behavioral-b", "heuristic", "stub"]
        );
    }

    #[test]
    fn test_framework_groups_keep_first_appearance_order() {
        let verdicts = aggregate(vec![
            result("zendriver", "stub", Rank::Stub, Outcome::Negative),
            result("pydoll", "stub", Rank::Stub, Outcome::Negative),
            result("zendriver", "heuristic", Rank::Heuristic, Outcome::Negative),
        ]);
        let order: Vec<&str> = verdicts.iter().map(|v| v.framework.as_str()).collect();
        assert_eq!(order, vec!["zendriver", "pydoll"]);
    }
}
