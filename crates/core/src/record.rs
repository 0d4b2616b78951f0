//! Result records and their fixed-layout wire format.
//!
//! A worker sends exactly one record over its report channel. The layout is
//! fixed so the harness knows how many bytes to wait for:
//!
//! ```text
//! offset  size  field
//!      0     4  magic "SRR1"
//!      4     1  tag (ASCII)
//!      5     4  effective priority (i32 LE)
//!      9     8  start tick (u64 LE)
//!     17     8  half-progress tick (u64 LE)
//!     25     8  completion tick (u64 LE)
//!     33     4  markers emitted (u32 LE)
//! ```

use crate::error::{CoreError, Result};
use crate::tier::{Priority, Tag};
use crate::Tick;
use serde::{Deserialize, Serialize};

/// Magic prefix of every encoded record.
pub const RECORD_MAGIC: [u8; 4] = *b"SRR1";

/// Encoded size of a [`ResultRecord`].
pub const RECORD_LEN: usize = 37;

/// Timing report produced once by each worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Worker tag
    pub tag: Tag,

    /// Priority in effect when the work finished
    pub priority: Priority,

    /// Tick at which timed work began
    pub start_tick: Tick,

    /// Tick at which half the markers had been emitted
    pub half_tick: Tick,

    /// Tick at which all work finished
    pub done_tick: Tick,

    /// Markers actually emitted
    pub markers: u32,
}

impl ResultRecord {
    /// Check `start_tick <= half_tick <= done_tick`.
    pub fn check_order(&self) -> Result<()> {
        if self.start_tick <= self.half_tick && self.half_tick <= self.done_tick {
            Ok(())
        } else {
            Err(CoreError::TimestampOrder {
                start: self.start_tick,
                half: self.half_tick,
                done: self.done_tick,
            })
        }
    }

    /// Encode into the fixed wire layout.
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..4].copy_from_slice(&RECORD_MAGIC);
        buf[4] = self.tag.as_byte();
        buf[5..9].copy_from_slice(&self.priority.get().to_le_bytes());
        buf[9..17].copy_from_slice(&self.start_tick.to_le_bytes());
        buf[17..25].copy_from_slice(&self.half_tick.to_le_bytes());
        buf[25..33].copy_from_slice(&self.done_tick.to_le_bytes());
        buf[33..37].copy_from_slice(&self.markers.to_le_bytes());
        buf
    }

    /// Decode a full-length buffer.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != RECORD_LEN {
            return Err(CoreError::RecordLength {
                expected: RECORD_LEN,
                actual: buf.len(),
            });
        }
        if buf[0..4] != RECORD_MAGIC {
            return Err(CoreError::BadMagic);
        }

        let record = Self {
            tag: Tag::from_byte(buf[4])?,
            priority: Priority(read_i32(buf, 5)),
            start_tick: read_u64(buf, 9),
            half_tick: read_u64(buf, 17),
            done_tick: read_u64(buf, 25),
            markers: read_u32(buf, 33),
        };
        record.check_order()?;
        Ok(record)
    }
}

fn read_i32(buf: &[u8], at: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    i32::from_le_bytes(bytes)
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(bytes)
}

fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}

/// What the harness actually received on one report channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// A full, well-formed record
    Complete(ResultRecord),

    /// The channel closed part-way through a record
    Short {
        /// Bytes received
        received: usize,
        /// Bytes expected
        expected: usize,
    },

    /// The channel closed before any byte arrived
    Missing,

    /// A full-length record that failed to decode
    Malformed {
        /// Why decoding failed
        reason: String,
    },
}

impl RecordOutcome {
    /// Classify the bytes read from the channel of the worker tagged `expected`.
    pub fn classify(expected: Tag, buf: &[u8]) -> Self {
        match buf.len() {
            0 => Self::Missing,
            n if n < RECORD_LEN => Self::Short {
                received: n,
                expected: RECORD_LEN,
            },
            _ => match ResultRecord::decode(buf) {
                Ok(record) if record.tag == expected => Self::Complete(record),
                Ok(record) => Self::Malformed {
                    reason: format!("tag {} on channel of {}", record.tag, expected),
                },
                Err(e) => Self::Malformed {
                    reason: e.to_string(),
                },
            },
        }
    }

    /// The record, if complete.
    pub fn record(&self) -> Option<&ResultRecord> {
        match self {
            Self::Complete(record) => Some(record),
            _ => None,
        }
    }

    /// Whether a full record arrived.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}
