//! Common type definitions for the search.
//!
//! # Overview
//!
//! - [`Candidate`]: a passphrase handed from the feeder to exactly one worker
//! - [`Recovery`]: the winning candidate together with its plaintext
//! - [`Signal`]: what a worker reports to the coordinator after each candidate
//! - [`FailurePolicy`]: whether a decrypt failure stops the whole search
//! - [`Outcome`] / [`SearchReport`]: the terminal result of a run

use std::fmt::{Display, Formatter, Result};
use std::time::Duration;

use crate::format::{FormatFailure, FormatKind};
use crate::secret::Passphrase;

/// A passphrase to try.
///
/// Ownership moves through the work channel, so no candidate is ever
/// processed by two workers.
#[derive(Debug)]
pub struct Candidate {
    /// The trimmed passphrase.
    pub passphrase: Passphrase,

    /// 1-based line number in the dictionary, for reporting.
    pub line: u64,
}

impl Candidate {
    #[inline]
    pub fn new(passphrase: &str, line: u64) -> Self {
        Self { passphrase: Passphrase::new(passphrase), line }
    }
}

/// A successful recovery.
#[derive(Debug)]
pub struct Recovery {
    pub passphrase: Passphrase,

    /// Unpadded plaintext accepted by the validity oracle.
    pub plaintext: Vec<u8>,

    /// The format that produced the plaintext.
    pub format: FormatKind,

    /// Dictionary line the passphrase came from.
    pub line: u64,
}

/// A worker's report about one candidate.
#[derive(Debug)]
pub enum Signal {
    /// Every format decrypted cleanly but none produced valid plaintext.
    Tried { line: u64 },

    /// At least one format could not decrypt and none succeeded.
    Failed { line: u64, failures: Vec<FormatFailure> },

    /// The candidate unlocked the ciphertext. Sent at most once per run.
    Found(Recovery),
}

/// How the coordinator treats decrypt failures reported by workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Count the failure and keep searching.
    #[default]
    Continue,

    /// Stop the whole search on the first reported failure.
    FailFast,
}

impl FailurePolicy {
    #[inline]
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast { Self::FailFast } else { Self::Continue }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            Self::Continue => "continue",
            Self::FailFast => "fail-fast",
        })
    }
}

/// Terminal state of a search.
#[derive(Debug)]
pub enum Outcome {
    /// A candidate produced valid plaintext.
    Found(Recovery),

    /// The dictionary ran out without a match.
    Exhausted,

    /// The fail-fast policy stopped the search on this decrypt failure.
    Failed { line: u64, failure: FormatFailure },
}

impl Outcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Everything the coordinator knows when the search ends.
#[derive(Debug)]
pub struct SearchReport {
    pub outcome: Outcome,

    /// Candidates fully tried before the outcome froze.
    pub tried: u64,

    /// Candidates whose attempt reported a decrypt failure.
    pub failures: u64,

    pub elapsed: Duration,
}
