//! Error taxonomy for the search.
//!
//! - [`SetupError`]: fatal, raised before any worker is spawned.
//! - [`AttemptError`]: one decrypt attempt produced unusable bytes. Expected
//!   and frequent for wrong passphrases, never aborts the search on its own.
//!
//! Feeder read failures are not typed here; they end the candidate stream
//! and are logged by the feeder.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::BLOCK_SIZE;

/// Failure to prepare a search. Always fatal.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("payload does not appear to be base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext is {0} bytes, shorter than one {BLOCK_SIZE}-byte block")]
    TooShort(usize),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Why a single (candidate, format) attempt could not produce plaintext.
///
/// This is the `DecryptFailure` arm of an attempt outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("invalid key length for cipher: {0} bytes")]
    KeyLength(usize),

    #[error("invalid iv length for cipher: {0} bytes")]
    IvLength(usize),

    #[error("ciphertext length {0} is not a multiple of the block size")]
    BlockAlignment(usize),

    #[error("no ciphertext left after the salt/iv prefix")]
    EmptyPlaintext,

    #[error("padding length {padding} exceeds plaintext length {len}")]
    PaddingOverflow { padding: usize, len: usize },

    #[error("key derivation failed: {0}")]
    Derivation(String),
}
