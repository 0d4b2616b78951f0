//! Worker side of a priority-ordering run.
//!
//! A worker burns a fixed amount of CPU, emits progress markers to a shared
//! stream, and sends one [`ResultRecord`](schedcheck_core::ResultRecord)
//! back to the harness.

#![warn(missing_docs)]

pub mod workload;
pub mod report;
pub mod worker;

pub use workload::burn;
pub use report::ReportChannel;
pub use worker::{run_worker, WorkerError, Result};
