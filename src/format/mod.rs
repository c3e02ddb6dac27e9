//! # Legacy Export Formats
//!
//! Every wallet export is AES-256-CBC over a JSON document, keyed by
//! PBKDF2-HMAC-SHA1 of the passphrase. The historical variants differ only
//! in the iteration count and in where the salt and IV come from:
//!
//! | format               | iterations | salt         | iv           |
//! |----------------------|-----------:|--------------|--------------|
//! | `modern`             | 10         | first block  | first block  |
//! | `legacy-single-pass` | 1          | first block  | first block  |
//! | `legacy-unsalted`    | 10         | empty        | all zeroes   |
//!
//! When a format takes its salt or IV from the first block, that block is
//! not part of the CBC ciphertext.
//!
//! A [`FormatChain`] tries its formats in declared order and stops at the
//! first one whose plaintext the [`Oracle`] accepts.

use clap::ValueEnum;
use secrecy::ExposeSecret;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::trace;

use crate::config::{BLOCK_SIZE, MODERN_ITERATIONS, SINGLE_PASS_ITERATIONS};
use crate::error::AttemptError;
use crate::oracle::Oracle;
use crate::padding::unpad;
use crate::secret::Passphrase;

mod cipher;
mod derive;
#[cfg(test)]
pub mod fixture;

pub use cipher::decrypt_cbc;
pub use derive::derive_key;

const ZERO_IV: [u8; BLOCK_SIZE] = [0u8; BLOCK_SIZE];

/// The known export variants, most recent first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum FormatKind {
    /// Current format: 10 rounds, salt and IV from the first block.
    Modern,

    /// Older format with a single PBKDF2 round.
    LegacySinglePass,

    /// Oldest format: no salt, zero IV, whole payload is ciphertext.
    LegacyUnsalted,
}

impl FormatKind {
    /// The exact parameters of this variant.
    pub const fn spec(self) -> FormatSpec {
        match self {
            Self::Modern => FormatSpec { kind: self, iterations: MODERN_ITERATIONS, salt: SaltPolicy::Prefix, iv: IvPolicy::Prefix },
            Self::LegacySinglePass => FormatSpec { kind: self, iterations: SINGLE_PASS_ITERATIONS, salt: SaltPolicy::Prefix, iv: IvPolicy::Prefix },
            Self::LegacyUnsalted => FormatSpec { kind: self, iterations: MODERN_ITERATIONS, salt: SaltPolicy::Empty, iv: IvPolicy::FixedZero },
        }
    }
}

/// Where the PBKDF2 salt comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaltPolicy {
    /// The first ciphertext block.
    Prefix,
    Empty,
}

/// Where the CBC initialization vector comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IvPolicy {
    /// The first ciphertext block.
    Prefix,
    /// No IV at all. The cipher rejects this, so every attempt is a decrypt failure.
    #[cfg_attr(not(test), expect(dead_code, reason = "no shipped format leaves the iv empty"))]
    Empty,
    FixedZero,
}

/// Key derivation and IV/salt handling for one export variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    pub kind: FormatKind,
    pub iterations: u32,
    pub salt: SaltPolicy,
    pub iv: IvPolicy,
}

/// Salt, IV and CBC body of a ciphertext as seen by one format.
struct Layout<'a> {
    salt: &'a [u8],
    iv: &'a [u8],
    body: &'a [u8],
}

impl FormatSpec {
    /// Whether the first block is consumed as salt/IV material.
    #[inline]
    pub fn consumes_prefix(&self) -> bool {
        self.salt == SaltPolicy::Prefix || self.iv == IvPolicy::Prefix
    }

    fn layout<'a>(&self, ciphertext: &'a [u8]) -> Result<Layout<'a>, AttemptError> {
        let (prefix, body) = if self.consumes_prefix() {
            if ciphertext.len() < BLOCK_SIZE {
                return Err(AttemptError::EmptyPlaintext);
            }
            ciphertext.split_at(BLOCK_SIZE)
        } else {
            (&ciphertext[..0], ciphertext)
        };

        let salt = match self.salt {
            SaltPolicy::Prefix => prefix,
            SaltPolicy::Empty => &[],
        };

        let iv: &[u8] = match self.iv {
            IvPolicy::Prefix => prefix,
            IvPolicy::Empty => &[],
            IvPolicy::FixedZero => &ZERO_IV,
        };

        Ok(Layout { salt, iv, body })
    }

    /// Decrypts and unpads `ciphertext` under `passphrase`.
    pub fn decrypt(&self, passphrase: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, AttemptError> {
        let layout = self.layout(ciphertext)?;
        let key = derive_key(passphrase, layout.salt, self.iterations)?;

        let mut plaintext = decrypt_cbc(key.expose_secret(), layout.iv, layout.body)?;
        let len = unpad(&plaintext)?.len();
        plaintext.truncate(len);

        Ok(plaintext)
    }
}

/// A decrypt failure attributed to the format that hit it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatFailure {
    pub format: FormatKind,
    pub error: AttemptError,
}

impl std::fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.format, self.error)
    }
}

/// Result of running one candidate through a [`FormatChain`].
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A format produced plaintext the oracle accepted.
    Success { plaintext: Vec<u8>, format: FormatKind },

    /// Every format decrypted but no plaintext was valid.
    NotValid,

    /// No format succeeded and at least one could not decrypt at all.
    /// Never empty.
    DecryptFailure(Vec<FormatFailure>),
}

/// An ordered list of formats to try for each candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatChain {
    formats: Vec<FormatSpec>,
}

impl FormatChain {
    /// Builds a chain from `kinds`, keeping the first occurrence of each.
    pub fn new(kinds: &[FormatKind]) -> Self {
        let mut formats: Vec<FormatSpec> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if !formats.iter().any(|spec| spec.kind == *kind) {
                formats.push(kind.spec());
            }
        }
        Self { formats }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn kinds(&self) -> impl Iterator<Item = FormatKind> + '_ {
        self.formats.iter().map(|spec| spec.kind)
    }

    /// Tries every format in order until one yields valid plaintext.
    ///
    /// Decrypt failures are collected rather than returned early, since a
    /// later format may still succeed.
    pub fn try_formats(&self, passphrase: &Passphrase, ciphertext: &[u8], oracle: &dyn Oracle) -> AttemptOutcome {
        let mut failures = Vec::new();

        for spec in &self.formats {
            match spec.decrypt(passphrase.as_bytes(), ciphertext) {
                Ok(plaintext) if oracle.is_valid(&plaintext) => {
                    return AttemptOutcome::Success { plaintext, format: spec.kind };
                }
                Ok(_) => {}
                Err(error) => {
                    trace!(format = %spec.kind, %error, "decrypt failure");
                    failures.push(FormatFailure { format: spec.kind, error });
                }
            }
        }

        if failures.is_empty() { AttemptOutcome::NotValid } else { AttemptOutcome::DecryptFailure(failures) }
    }
}

impl Default for FormatChain {
    fn default() -> Self {
        Self { formats: FormatKind::iter().map(FormatKind::spec).collect() }
    }
}
