//! Loading the encrypted wallet export.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytesize::ByteSize;
use tracing::{debug, info};

use crate::config::BLOCK_SIZE;
use crate::error::SetupError;

/// The decoded ciphertext. Immutable for the whole run and shared
/// read-only by every worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    bytes: Vec<u8>,
}

impl Ciphertext {
    /// Decodes a base64 export. Line breaks and surrounding whitespace are ignored.
    pub fn decode(encoded: &str) -> Result<Self, SetupError> {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD.decode(compact)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SetupError> {
        if bytes.len() < BLOCK_SIZE {
            return Err(SetupError::TooShort(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// Reads and decodes the export at `path`.
    pub async fn load(path: &Path) -> Result<Self, SetupError> {
        let encoded = tokio::fs::read_to_string(path).await.map_err(|source| SetupError::Read { path: path.to_path_buf(), source })?;
        let ciphertext = Self::decode(&encoded)?;

        info!(path = %path.display(), size = %ByteSize::b(ciphertext.len() as u64), "loaded wallet export");
        debug!(prefix = %hex::encode(ciphertext.prefix()), "salt/iv block");

        Ok(ciphertext)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// The leading block that salted formats read as salt and IV.
    #[inline]
    pub fn prefix(&self) -> &[u8] {
        &self.bytes[..BLOCK_SIZE]
    }
}
