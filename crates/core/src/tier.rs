//! Tiers: the (tag, priority) pairs a run is configured with.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Single-character label identifying a worker.
///
/// The tag is also the marker byte the worker writes to the shared output
/// stream, so it must be one printable ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Tag(u8);

impl Tag {
    /// Create a tag from a character.
    pub fn new(c: char) -> Result<Self> {
        if c.is_ascii_graphic() {
            Ok(Self(c as u8))
        } else {
            Err(CoreError::InvalidTag(c.to_string()))
        }
    }

    /// Create a tag from a raw byte (as read off the wire).
    pub fn from_byte(b: u8) -> Result<Self> {
        Self::new(b as char)
    }

    /// The marker byte for this tag.
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// The tags used for positional tiers: `A`, `B`, `C`, ...
    ///
    /// Returns `None` past `Z`.
    pub fn nth(index: usize) -> Option<Self> {
        let index = u8::try_from(index).ok()?;
        let c = b'A'.checked_add(index)?;
        (c <= b'Z').then_some(Self(c))
    }
}

impl TryFrom<char> for Tag {
    type Error = CoreError;

    fn try_from(c: char) -> Result<Self> {
        Self::new(c)
    }
}

impl From<Tag> for char {
    fn from(tag: Tag) -> char {
        tag.0 as char
    }
}

impl FromStr for Tag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(CoreError::InvalidTag(s.to_string())),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

/// Scheduling priority value, as understood by the scheduler under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    /// Raw priority value
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which end of the priority scale receives more CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Smaller numbers are more urgent (POSIX nice semantics)
    #[default]
    LowerIsUrgent,
    /// Larger numbers are more urgent
    HigherIsUrgent,
}

impl Urgency {
    /// Compare two priorities by urgency.
    ///
    /// `Ordering::Greater` means `a` is more urgent than `b`.
    pub fn compare(self, a: Priority, b: Priority) -> Ordering {
        match self {
            Self::LowerIsUrgent => b.cmp(&a),
            Self::HigherIsUrgent => a.cmp(&b),
        }
    }

    /// Whether `a` is strictly more urgent than `b`.
    pub fn outranks(self, a: Priority, b: Priority) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

impl FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lower" | "lower-is-urgent" | "nice" => Ok(Self::LowerIsUrgent),
            "higher" | "higher-is-urgent" => Ok(Self::HigherIsUrgent),
            _ => Err(CoreError::InvalidUrgency(s.to_string())),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowerIsUrgent => write!(f, "lower"),
            Self::HigherIsUrgent => write!(f, "higher"),
        }
    }
}

/// One tier of a run: the worker's tag and its configured priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Worker tag
    pub tag: Tag,
    /// Configured priority
    pub priority: Priority,
}

impl TierSpec {
    /// Create a tier.
    pub fn new(tag: Tag, priority: Priority) -> Self {
        Self { tag, priority }
    }
}

impl FromStr for TierSpec {
    type Err = CoreError;

    /// Parse `TAG=PRIORITY`, e.g. `A=12`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidTier(s.to_string());
        let (tag, priority) = s.split_once('=').ok_or_else(invalid)?;
        let tag = tag.trim().parse::<Tag>().map_err(|_| invalid())?;
        let priority = priority.trim().parse::<i32>().map_err(|_| invalid())?;
        Ok(Self::new(tag, Priority(priority)))
    }
}

impl fmt::Display for TierSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.priority)
    }
}
