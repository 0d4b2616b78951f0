//! The pairwise ordering check.

use crate::verdict::{CheckOutcome, PairCheck, Verdict, VerifyPath};
use schedcheck_core::{RecordOutcome, ResultRecord, TierSpec, Urgency};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Parameters of the ordering check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPolicy {
    /// Minimum completion gap, in ticks (at least 1)
    pub epsilon: u64,
    /// Which end of the priority scale is more urgent
    pub urgency: Urgency,
}

impl VerifyPolicy {
    /// Create a policy; `epsilon` is raised to 1 if smaller.
    pub fn new(epsilon: u64, urgency: Urgency) -> Self {
        Self {
            epsilon: epsilon.max(1),
            urgency,
        }
    }
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self::new(1, Urgency::default())
    }
}

/// A configured tier together with what its worker reported.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Tier as configured
    pub tier: TierSpec,
    /// What arrived on its report channel
    pub outcome: &'a RecordOutcome,
}

impl<'a> Observation<'a> {
    /// Pair a tier with its outcome.
    pub fn new(tier: TierSpec, outcome: &'a RecordOutcome) -> Self {
        Self { tier, outcome }
    }
}

/// Check that workers finished in the order their configured priorities demand.
///
/// For every pair with different priorities, the more urgent worker must
/// complete at least `epsilon` ticks before the other. Pairs with equal
/// priorities are unconstrained. When the priorities are already listed in
/// strict order only neighbours are compared, relying on transitivity for
/// the rest; any other arrangement checks every constrained pair.
pub fn verify(policy: &VerifyPolicy, observations: &[Observation<'_>]) -> Verdict {
    let (path, pairs) = if strictly_ordered(observations) {
        (VerifyPath::Chained, chained_pairs(policy.urgency, observations))
    } else {
        (VerifyPath::Pairwise, constrained_pairs(policy.urgency, observations))
    };

    let checks: Vec<PairCheck> = pairs
        .into_iter()
        .map(|(earlier, later)| check_pair(policy.epsilon, &observations[earlier], &observations[later]))
        .collect();

    let verdict = Verdict {
        epsilon: policy.epsilon,
        path,
        checks,
    };
    info!(
        path = ?verdict.path,
        checks = verdict.checks.len(),
        held = verdict.ordering_held(),
        "ordering verified"
    );
    verdict
}

/// Priorities already listed in strictly ascending or strictly descending order.
fn strictly_ordered(observations: &[Observation<'_>]) -> bool {
    let ascending = observations
        .windows(2)
        .all(|w| w[0].tier.priority < w[1].tier.priority);
    let descending = observations
        .windows(2)
        .all(|w| w[0].tier.priority > w[1].tier.priority);
    ascending || descending
}

/// Neighbouring pairs in urgency order, most urgent first.
fn chained_pairs(urgency: Urgency, observations: &[Observation<'_>]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by(|&a, &b| {
        urgency.compare(observations[b].tier.priority, observations[a].tier.priority)
    });
    order.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Every pair with a priority difference, more urgent member first.
fn constrained_pairs(urgency: Urgency, observations: &[Observation<'_>]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..observations.len() {
        for j in i + 1..observations.len() {
            match urgency.compare(observations[i].tier.priority, observations[j].tier.priority) {
                Ordering::Greater => pairs.push((i, j)),
                Ordering::Less => pairs.push((j, i)),
                Ordering::Equal => {}
            }
        }
    }
    pairs
}

fn check_pair(epsilon: u64, earlier: &Observation<'_>, later: &Observation<'_>) -> PairCheck {
    let outcome = match (complete(earlier), complete(later)) {
        (Ok(a), Ok(b)) => {
            if strictly_earlier(a.done_tick, b.done_tick, epsilon) {
                CheckOutcome::Held
            } else {
                CheckOutcome::Violated {
                    gap: tick_gap(a.done_tick, b.done_tick),
                }
            }
        }
        (Err(reason), _) | (_, Err(reason)) => CheckOutcome::Unverifiable { reason },
    };

    debug!(
        earlier = %earlier.tier.tag,
        later = %later.tier.tag,
        ?outcome,
        "pair checked"
    );

    PairCheck {
        earlier: earlier.tier.tag,
        later: later.tier.tag,
        outcome,
    }
}

/// `later - earlier`, saturated to the `i64` range.
fn tick_gap(earlier: u64, later: u64) -> i64 {
    let gap = i128::from(later) - i128::from(earlier);
    i64::try_from(gap).unwrap_or(if gap < 0 { i64::MIN } else { i64::MAX })
}

fn strictly_earlier(a_done: u64, b_done: u64, epsilon: u64) -> bool {
    a_done.saturating_add(epsilon) <= b_done
}

fn complete<'a>(observation: &Observation<'a>) -> Result<&'a ResultRecord, String> {
    let tag = observation.tier.tag;
    match observation.outcome {
        RecordOutcome::Complete(record) => Ok(record),
        RecordOutcome::Missing => Err(format!("{tag}: no record")),
        RecordOutcome::Short { received, expected } => {
            Err(format!("{tag}: short read {received}/{expected} bytes"))
        }
        RecordOutcome::Malformed { reason } => Err(format!("{tag}: malformed record ({reason})")),
    }
}
