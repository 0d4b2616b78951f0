//! Deterministic stand-in for the scheduler, for unit tests.

use crate::r#trait::{PlatformError, Result, SchedulerOps};
use schedcheck_core::{Priority, Tick};
use std::cell::Cell;

/// A scheduler whose clock advances by a fixed step on every read.
#[derive(Debug)]
pub struct FakeScheduler {
    priority: Cell<Priority>,
    external: Cell<Option<Priority>>,
    tick: Cell<Tick>,
    step: Tick,
    refuse_priority: bool,
    pinned: Cell<Option<usize>>,
    tick_reads: Cell<u32>,
}

impl FakeScheduler {
    /// Create a fake starting at tick `start`, advancing `step` per read.
    pub fn new(start: Tick, step: Tick) -> Self {
        Self {
            priority: Cell::new(Priority(0)),
            external: Cell::new(None),
            tick: Cell::new(start),
            step,
            refuse_priority: false,
            pinned: Cell::new(None),
            tick_reads: Cell::new(0),
        }
    }

    /// Make every `set_priority` call fail.
    pub fn refusing_priority(mut self) -> Self {
        self.refuse_priority = true;
        self
    }

    /// Simulate an outside party changing the priority after it was set.
    pub fn override_priority(&self, priority: Priority) {
        self.external.set(Some(priority));
    }

    /// Priority last assigned through `set_priority`.
    pub fn assigned_priority(&self) -> Priority {
        self.priority.get()
    }

    /// CPU the caller pinned to, if any.
    pub fn pinned_cpu(&self) -> Option<usize> {
        self.pinned.get()
    }

    /// How many times the clock was read.
    pub fn tick_reads(&self) -> u32 {
        self.tick_reads.get()
    }
}

impl Default for FakeScheduler {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl SchedulerOps for FakeScheduler {
    fn set_priority(&self, priority: Priority) -> Result<()> {
        if self.refuse_priority {
            return Err(PlatformError::SetPriority {
                priority,
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.priority.set(priority);
        Ok(())
    }

    fn priority(&self) -> Result<Priority> {
        Ok(self.external.get().unwrap_or_else(|| self.priority.get()))
    }

    fn current_tick(&self) -> Result<Tick> {
        let now = self.tick.get();
        self.tick.set(now + self.step);
        self.tick_reads.set(self.tick_reads.get() + 1);
        Ok(now)
    }

    fn pin_to_cpu(&self, cpu: usize) -> Result<()> {
        self.pinned.set(Some(cpu));
        Ok(())
    }
}
