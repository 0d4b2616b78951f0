//! schedcheck core data models.
//!
//! This crate defines the values that flow between the harness, the
//! workers and the verifier of a priority-ordering run.

#![warn(missing_docs)]

// Identities
mod id;

// Tiers and per-worker configuration
mod tier;
mod worker_config;

// Result records and their wire format
mod record;
mod error;

// Re-exports
pub use id::RunId;
pub use tier::{Tag, Priority, Urgency, TierSpec};
pub use worker_config::WorkerConfig;
pub use record::{ResultRecord, RecordOutcome, RECORD_LEN, RECORD_MAGIC};
pub use error::{CoreError, Result};

/// Scheduler tick, as returned by the monotonic tick primitive.
pub type Tick = u64;

/// Wall-clock timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
