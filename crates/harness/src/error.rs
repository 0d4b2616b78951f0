//! Harness errors.

use schedcheck_core::Tag;

/// Error type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Setup failures that abort a run.
///
/// Anything that goes wrong inside a worker is not an error here: it shows
/// up as a missing, short or malformed record.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The run configuration cannot be executed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The harness could not locate its own executable
    #[error("cannot locate worker executable: {0}")]
    CurrentExe(#[source] std::io::Error),

    /// A worker process could not be started
    #[error("cannot spawn worker {tag}: {source}")]
    Spawn {
        /// Tag of the worker
        tag: Tag,
        /// OS error
        #[source]
        source: std::io::Error,
    },

    /// A worker was started without a readable report channel
    #[error("worker {0} has no report channel")]
    NoReportChannel(Tag),
}
