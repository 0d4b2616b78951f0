//! Verdicts and their printed labels.

use schedcheck_core::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which comparison strategy the verifier used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyPath {
    /// Priorities were all distinct: only neighbours in urgency order were compared
    Chained,
    /// Some priorities tied: every pair with a priority difference was compared
    Pairwise,
}

/// Result of one "must finish first" comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// `earlier` finished at least epsilon ticks before `later`
    Held,
    /// It did not; `gap` is `later.done - earlier.done` (may be negative)
    Violated {
        /// Observed completion gap in ticks
        gap: i64,
    },
    /// One of the two records never arrived intact
    Unverifiable {
        /// Which record was unusable and why
        reason: String,
    },
}

/// One ordering constraint and how it fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCheck {
    /// Worker that must finish first
    pub earlier: Tag,
    /// Worker that must finish later
    pub later: Tag,
    /// Outcome
    pub outcome: CheckOutcome,
}

impl PairCheck {
    /// Whether the constraint held.
    pub fn held(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Held)
    }
}

/// Verdict over all constraints of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Minimum tick gap required
    pub epsilon: u64,
    /// Comparison strategy used
    pub path: VerifyPath,
    /// Individual constraints
    pub checks: Vec<PairCheck>,
}

impl Verdict {
    /// True when every required ordering held.
    ///
    /// Vacuously true when no pair needed ordering (all priorities equal).
    pub fn ordering_held(&self) -> bool {
        self.checks.iter().all(PairCheck::held)
    }

    /// Constraints that did not hold.
    pub fn failures(&self) -> impl Iterator<Item = &PairCheck> {
        self.checks.iter().filter(|c| !c.held())
    }

    /// The `verify(eps=…): …` line.
    pub fn line(&self, labels: VerdictLabels) -> String {
        format!("verify(eps={}): {}", self.epsilon, labels.label(self.ordering_held()))
    }
}

/// How the verdict is labelled when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabels {
    /// `PASS` when ordering held
    #[default]
    Conventional,
    /// `FAIL` when ordering held, the historical labelling of this test
    Inverted,
}

impl VerdictLabels {
    /// Label for a verdict whose ordering did (`true`) or did not hold.
    pub fn label(self, ordering_held: bool) -> &'static str {
        match (self, ordering_held) {
            (Self::Conventional, true) | (Self::Inverted, false) => "PASS",
            (Self::Conventional, false) | (Self::Inverted, true) => "FAIL",
        }
    }
}

impl fmt::Display for VerdictLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conventional => write!(f, "conventional"),
            Self::Inverted => write!(f, "inverted"),
        }
    }
}
