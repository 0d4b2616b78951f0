//! CPU affinity.
//!
//! Priority only decides anything when workers compete for the same CPU.
//! On a multi-core host three CPU-bound workers would each get a core of
//! their own, so every worker pins itself to one shared CPU first.
//!
//! In containers the allowed set may not start at CPU 0; use
//! [`first_allowed_cpu`] rather than assuming it.

use crate::r#trait::{PlatformError, Result};
use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::Pid;
use tracing::debug;

/// Pin the calling process to `cpu`.
pub fn pin_current_process(cpu: usize) -> Result<()> {
    let mut set = CpuSet::new();
    set.set(cpu)
        .map_err(|source| PlatformError::Affinity { cpu, source })?;
    sched_setaffinity(Pid::from_raw(0), &set)
        .map_err(|source| PlatformError::Affinity { cpu, source })?;
    debug!(cpu, "pinned to cpu");
    Ok(())
}

/// Returns the first CPU in the calling process's allowed set, if any.
pub fn first_allowed_cpu() -> Option<usize> {
    let allowed = sched_getaffinity(Pid::from_raw(0)).ok()?;
    (0..CpuSet::count()).find(|&cpu| allowed.is_set(cpu).unwrap_or(false))
}
