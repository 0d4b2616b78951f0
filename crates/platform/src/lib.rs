//! Scheduler primitives.
//!
//! The scheduler under test is process-wide state this project does not
//! own. Workers only touch it through [`SchedulerOps`], so the worker loop
//! runs against [`OsScheduler`] in production and [`FakeScheduler`] in unit
//! tests.

#![warn(missing_docs)]

pub mod r#trait;
pub mod os;
pub mod fake;
pub mod affinity;

pub use r#trait::{SchedulerOps, PlatformError, Result};
pub use os::OsScheduler;
pub use fake::FakeScheduler;
pub use affinity::{first_allowed_cpu, pin_current_process};
