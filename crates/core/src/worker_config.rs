//! Per-worker configuration, fixed before the worker is spawned.

use crate::tier::{Priority, Tag};
use serde::{Deserialize, Serialize};

/// Immutable configuration handed to one worker at spawn time.
///
/// The report channel is not part of this value: it is the worker's own
/// stdout, handed over by the process launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Identity tag (also the marker byte)
    pub tag: Tag,

    /// Priority the worker assigns to itself before timing starts
    pub priority: Priority,

    /// Number of workload iterations
    pub loop_count: u64,

    /// Work units burned per iteration
    pub work_size: u64,

    /// Number of progress markers to emit (at least 1)
    pub marker_count: u32,

    /// Tick length in milliseconds
    pub tick_ms: u64,

    /// CPU to pin to before timing starts, if any
    pub cpu: Option<usize>,
}

impl WorkerConfig {
    /// Iterations between two markers: `loop_count / marker_count`, at least 1.
    pub fn stride(&self) -> u64 {
        (self.loop_count / u64::from(self.marker_count.max(1))).max(1)
    }

    /// Marker count at which the half-progress tick is taken.
    ///
    /// Zero when `marker_count` is 1, which can never be hit because the
    /// count is compared after incrementing.
    pub fn half_mark(&self) -> u32 {
        self.marker_count / 2
    }
}
