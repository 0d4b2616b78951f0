//! Run reports and summary rendering.

use crate::config::RunConfig;
use schedcheck_core::{RecordOutcome, RunId, TierSpec, Time};
use schedcheck_verify::Verdict;
use serde::{Deserialize, Serialize};

/// What one tier's worker delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Tier as configured
    pub tier: TierSpec,
    /// What arrived on the report channel
    pub outcome: RecordOutcome,
}

impl WorkerReport {
    /// The `stats:` line for this worker.
    ///
    /// Workers without a complete record keep the `stats: <tag>` prefix and
    /// show why their numbers are absent.
    pub fn stats_line(&self) -> String {
        let tag = self.tier.tag;
        match &self.outcome {
            RecordOutcome::Complete(r) => format!(
                "stats: {} pri={} half={} done={} marks={}",
                tag, r.priority, r.half_tick, r.done_tick, r.markers
            ),
            RecordOutcome::Missing => format!("stats: {tag} <missing>"),
            RecordOutcome::Short { received, expected } => {
                format!("stats: {tag} <short read {received}/{expected} bytes>")
            }
            RecordOutcome::Malformed { reason } => format!("stats: {tag} <malformed: {reason}>"),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: RunId,
    /// When the first worker was launched
    pub started_at: Time,
    /// When the last worker was reaped
    pub finished_at: Time,
    /// Configuration the run used
    pub config: RunConfig,
    /// CPU the workers were pinned to
    pub cpu: Option<usize>,
    /// Per-worker results, in tier order
    pub workers: Vec<WorkerReport>,
    /// Ordering verdict
    pub verdict: Verdict,
}

impl RunReport {
    /// One `stats:` line per worker followed by the `verify(…)` line.
    pub fn summary_lines(&self) -> Vec<String> {
        self.workers
            .iter()
            .map(WorkerReport::stats_line)
            .chain(std::iter::once(self.verdict.line(self.config.labels)))
            .collect()
    }

    /// Whether the required ordering held.
    pub fn ordering_held(&self) -> bool {
        self.verdict.ordering_held()
    }

    /// Whether every worker delivered a complete record.
    pub fn all_complete(&self) -> bool {
        self.workers.iter().all(|w| w.outcome.is_complete())
    }

    /// The report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
