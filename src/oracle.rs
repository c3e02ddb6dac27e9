//! Plaintext validity checks.
//!
//! Decrypting under a wrong key always "succeeds" at the cipher level, so the
//! only way to recognise the right passphrase is to check that the output is
//! well-formed. Wallet exports are JSON documents.

use serde_json::Value;

/// Decides whether decrypted bytes are a well-formed plaintext.
pub trait Oracle: Send + Sync {
    fn is_valid(&self, plaintext: &[u8]) -> bool;
}

/// Accepts plaintext that parses as a JSON object or array.
///
/// Bare scalars are rejected: a one-byte digit is valid JSON and turns up
/// often enough in wrong-key garbage to cause false positives.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOracle;

impl Oracle for JsonOracle {
    fn is_valid(&self, plaintext: &[u8]) -> bool {
        matches!(serde_json::from_slice::<Value>(plaintext), Ok(Value::Object(_) | Value::Array(_)))
    }
}

impl<F> Oracle for F
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn is_valid(&self, plaintext: &[u8]) -> bool {
        self(plaintext)
    }
}
