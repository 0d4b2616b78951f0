//! Scheduler abstraction.

use schedcheck_core::{Priority, Tick};

/// Error type for scheduler primitives.
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors that can occur while talking to the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Assigning a priority was refused
    #[error("cannot set priority {priority}: {source}")]
    SetPriority {
        /// Requested priority
        priority: Priority,
        /// OS error
        #[source]
        source: std::io::Error,
    },

    /// Reading the current priority failed
    #[error("cannot read priority: {0}")]
    GetPriority(#[source] std::io::Error),

    /// The monotonic clock could not be read
    #[error("cannot read monotonic clock: {0}")]
    Clock(#[source] nix::Error),

    /// Tick length of zero
    #[error("tick length must be at least 1 ms")]
    ZeroTick,

    /// Pinning to a CPU failed
    #[error("cannot pin to cpu {cpu}: {source}")]
    Affinity {
        /// Requested CPU
        cpu: usize,
        /// OS error
        #[source]
        source: nix::Error,
    },
}

/// The scheduler primitives a worker relies on.
///
/// All methods act on the calling process.
pub trait SchedulerOps {
    /// Assign a scheduling priority.
    fn set_priority(&self, priority: Priority) -> Result<()>;

    /// Read the priority currently in effect.
    fn priority(&self) -> Result<Priority>;

    /// Read the monotonic tick counter.
    ///
    /// Ticks from different processes of the same run are comparable.
    fn current_tick(&self) -> Result<Tick>;

    /// Restrict execution to one CPU.
    fn pin_to_cpu(&self, cpu: usize) -> Result<()>;
}
