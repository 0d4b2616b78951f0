//! Run configuration.

use crate::error::{HarnessError, Result};
use schedcheck_core::{Priority, Tag, TierSpec, Urgency, WorkerConfig};
use schedcheck_platform::first_allowed_cpu;
use schedcheck_verify::{VerdictLabels, VerifyPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// CPU placement of the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuPin {
    /// Pin every worker to the first CPU the harness may run on
    #[default]
    Auto,
    /// Pin every worker to this CPU
    Cpu(usize),
    /// Leave placement to the scheduler
    Off,
}

impl CpuPin {
    /// The CPU workers should pin to, if any.
    pub fn resolve(self) -> Option<usize> {
        match self {
            Self::Auto => first_allowed_cpu(),
            Self::Cpu(cpu) => Some(cpu),
            Self::Off => None,
        }
    }
}

/// Configuration for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// One worker per tier, in summary order
    pub tiers: Vec<TierSpec>,
    /// Workload iterations per worker
    pub loop_count: u64,
    /// Work units per iteration
    pub work_size: u64,
    /// Markers per worker (at least 1)
    pub marker_count: u32,
    /// Minimum completion gap in ticks (at least 1)
    pub epsilon: u64,
    /// Tick length in milliseconds
    pub tick_ms: u64,
    /// Which end of the priority scale is more urgent
    pub urgency: Urgency,
    /// CPU placement
    pub pin: CpuPin,
    /// Verdict label polarity
    pub labels: VerdictLabels,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tiers: Self::positional_tiers(Priority(12), Priority(8), Priority(4)),
            loop_count: 1500,
            work_size: 150_000,
            marker_count: 20,
            epsilon: 1,
            tick_ms: 10,
            urgency: Urgency::default(),
            pin: CpuPin::default(),
            labels: VerdictLabels::default(),
        }
    }
}

impl RunConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiers `A`, `B`, `C` with the given priorities.
    pub fn positional_tiers(a: Priority, b: Priority, c: Priority) -> Vec<TierSpec> {
        [a, b, c]
            .into_iter()
            .enumerate()
            .filter_map(|(i, priority)| Tag::nth(i).map(|tag| TierSpec::new(tag, priority)))
            .collect()
    }

    /// Replace the tier list.
    pub fn with_tiers(mut self, tiers: Vec<TierSpec>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set iterations per worker.
    pub fn with_loop_count(mut self, loop_count: u64) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Set work units per iteration.
    pub fn with_work_size(mut self, work_size: u64) -> Self {
        self.work_size = work_size;
        self
    }

    /// Set markers per worker; raised to 1 if smaller.
    pub fn with_marker_count(mut self, marker_count: u32) -> Self {
        self.marker_count = marker_count.max(1);
        self
    }

    /// Set the minimum completion gap; raised to 1 if smaller.
    pub fn with_epsilon(mut self, epsilon: u64) -> Self {
        self.epsilon = epsilon.max(1);
        self
    }

    /// Set the tick length.
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set priority polarity.
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Set CPU placement.
    pub fn with_pin(mut self, pin: CpuPin) -> Self {
        self.pin = pin;
        self
    }

    /// Set verdict label polarity.
    pub fn with_labels(mut self, labels: VerdictLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(HarnessError::InvalidConfig("no tiers configured".into()));
        }
        let mut seen = HashSet::new();
        for tier in &self.tiers {
            if !seen.insert(tier.tag) {
                return Err(HarnessError::InvalidConfig(format!("duplicate tag {}", tier.tag)));
            }
        }
        if self.tick_ms == 0 {
            return Err(HarnessError::InvalidConfig("tick length must be at least 1 ms".into()));
        }
        if self.marker_count == 0 {
            return Err(HarnessError::InvalidConfig("marker count must be at least 1".into()));
        }
        if self.epsilon == 0 {
            return Err(HarnessError::InvalidConfig("epsilon must be at least 1".into()));
        }
        Ok(())
    }

    /// One worker configuration per tier, pinned to `cpu` if given.
    pub fn worker_configs(&self, cpu: Option<usize>) -> Vec<WorkerConfig> {
        self.tiers
            .iter()
            .map(|tier| WorkerConfig {
                tag: tier.tag,
                priority: tier.priority,
                loop_count: self.loop_count,
                work_size: self.work_size,
                marker_count: self.marker_count,
                tick_ms: self.tick_ms,
                cpu,
            })
            .collect()
    }

    /// Verifier parameters for this run.
    pub fn verify_policy(&self) -> VerifyPolicy {
        VerifyPolicy::new(self.epsilon, self.urgency)
    }
}
