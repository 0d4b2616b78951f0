//! Scheduler primitives backed by the host OS.
//!
//! Priority is the POSIX nice value of the calling process, ticks come from
//! `CLOCK_MONOTONIC`, which is shared by every process on the host.

use crate::affinity::pin_current_process;
use crate::r#trait::{PlatformError, Result, SchedulerOps};
use nix::time::{clock_gettime, ClockId};
use schedcheck_core::{Priority, Tick};
use tracing::debug;

const NANOS_PER_MS: i128 = 1_000_000;

/// The real scheduler of the host.
#[derive(Debug, Clone, Copy)]
pub struct OsScheduler {
    tick_ms: u64,
}

impl OsScheduler {
    /// Create a scheduler handle that counts ticks of `tick_ms` milliseconds.
    pub fn new(tick_ms: u64) -> Result<Self> {
        if tick_ms == 0 {
            return Err(PlatformError::ZeroTick);
        }
        Ok(Self { tick_ms })
    }

    /// Tick length in milliseconds.
    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }
}

impl SchedulerOps for OsScheduler {
    fn set_priority(&self, priority: Priority) -> Result<()> {
        // SAFETY: setpriority has no memory-safety preconditions; who=0 is the caller.
        let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, priority.get()) };
        if rc == -1 {
            return Err(PlatformError::SetPriority {
                priority,
                source: std::io::Error::last_os_error(),
            });
        }
        debug!(%priority, "priority assigned");
        Ok(())
    }

    fn priority(&self) -> Result<Priority> {
        // getpriority may legitimately return -1, so errno is the only
        // failure signal and has to be cleared first.
        // SAFETY: no memory-safety preconditions; who=0 is the caller.
        let raw = unsafe {
            nix::errno::Errno::clear();
            libc::getpriority(libc::PRIO_PROCESS, 0)
        };
        if raw == -1 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error().is_some_and(|code| code != 0) {
                return Err(PlatformError::GetPriority(err));
            }
        }
        Ok(Priority(raw))
    }

    fn current_tick(&self) -> Result<Tick> {
        let now = clock_gettime(ClockId::CLOCK_MONOTONIC).map_err(PlatformError::Clock)?;
        let nanos = i128::from(now.tv_sec()) * 1_000_000_000 + i128::from(now.tv_nsec());
        let ticks = nanos / (NANOS_PER_MS * i128::from(self.tick_ms));
        Ok(u64::try_from(ticks).unwrap_or(0))
    }

    fn pin_to_cpu(&self, cpu: usize) -> Result<()> {
        pin_current_process(cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tick_rejected() {
        assert!(matches!(OsScheduler::new(0), Err(PlatformError::ZeroTick)));
    }

    #[test]
    fn test_ticks_are_monotonic() {
        let sched = OsScheduler::new(1).unwrap();
        let a = sched.current_tick().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = sched.current_tick().unwrap();
        assert!(b >= a + 4, "a={a} b={b}");
    }

    #[test]
    fn test_priority_readable() {
        let sched = OsScheduler::new(10).unwrap();
        let nice = sched.priority().unwrap();
        assert!((-20..=19).contains(&nice.get()));
    }
}
