//! Harness for priority-ordering runs.
//!
//! Spawns one worker process per tier, collects each worker's record from
//! its report channel, reaps every child and verifies completion order.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod channel;
pub mod launcher;
pub mod orchestrator;
pub mod report;

pub use config::{RunConfig, CpuPin};
pub use error::{HarnessError, Result};
pub use channel::read_record;
pub use launcher::{WorkerLauncher, WorkerProcess, LaunchedWorker, ProcessLauncher};
pub use orchestrator::Harness;
pub use report::{RunReport, WorkerReport};
