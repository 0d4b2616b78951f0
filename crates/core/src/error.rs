//! Errors raised while building or decoding core values.

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while constructing or decoding core values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Tag is not a single printable ASCII character
    #[error("invalid tag {0:?}: expected one printable ASCII character")]
    InvalidTag(String),

    /// Urgency keyword not recognised
    #[error("invalid urgency {0:?}: expected \"lower\" or \"higher\"")]
    InvalidUrgency(String),

    /// Tier not of the form TAG=PRI
    #[error("invalid tier {0:?}: expected TAG=PRIORITY")]
    InvalidTier(String),

    /// Record buffer has the wrong length
    #[error("record length {actual} does not match {expected}")]
    RecordLength {
        /// Expected byte count
        expected: usize,
        /// Received byte count
        actual: usize,
    },

    /// Record does not start with the expected magic
    #[error("bad record magic")]
    BadMagic,

    /// Timestamps out of order
    #[error("timestamps out of order: start={start} half={half} done={done}")]
    TimestampOrder {
        /// Start tick
        start: u64,
        /// Half-progress tick
        half: u64,
        /// Completion tick
        done: u64,
    },
}
