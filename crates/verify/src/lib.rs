//! Ordering verification.
//!
//! Decides which workers must have finished before which, given their
//! configured priorities, and checks the completion ticks they reported.

#![warn(missing_docs)]

pub mod verdict;
pub mod verifier;

pub use verdict::{Verdict, VerdictLabels, VerifyPath, PairCheck, CheckOutcome};
pub use verifier::{verify, Observation, VerifyPolicy};
