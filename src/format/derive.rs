//! PBKDF2-HMAC-SHA1 key derivation used by every export format.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use secrecy::{ExposeSecretMut, SecretBox};
use sha1::Sha1;

use crate::config::KEY_LEN;
use crate::error::AttemptError;

/// A derived AES-256 key, zeroed on drop.
pub type DerivedKey = SecretBox<[u8; KEY_LEN]>;

/// Derives a [`KEY_LEN`]-byte key from `passphrase` and `salt`.
///
/// An empty salt is legal; the unsalted legacy format depends on it.
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey, AttemptError> {
    if iterations == 0 {
        return Err(AttemptError::Derivation(String::from("iterations must be at least 1")));
    }

    let mut key = SecretBox::new(Box::new([0u8; KEY_LEN]));
    pbkdf2::<Hmac<Sha1>>(passphrase, salt, iterations, key.expose_secret_mut()).map_err(|e| AttemptError::Derivation(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    // RFC 6070 vectors, truncated/extended to 32 bytes of output.
    #[test]
    fn test_rfc6070_single_iteration() {
        let key = derive_key(b"password", b"salt", 1).unwrap();
        assert_eq!(hex::encode(&key.expose_secret()[..20]), "0c60c80f961f0e71f3a9b524af6012062fe037a6");
    }

    #[test]
    fn test_rfc6070_two_iterations() {
        let key = derive_key(b"password", b"salt", 2).unwrap();
        assert_eq!(hex::encode(&key.expose_secret()[..20]), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    }

    #[test]
    fn test_derive_key_deterministic() {
        let first = derive_key(b"stack901", &[], 10).unwrap();
        let second = derive_key(b"stack901", &[], 10).unwrap();
        assert_eq!(first.expose_secret(), second.expose_secret());
    }

    #[test]
    fn test_iterations_change_key() {
        let salt = [7u8; 16];
        let one = derive_key(b"stack901", &salt, 1).unwrap();
        let ten = derive_key(b"stack901", &salt, 10).unwrap();
        assert_ne!(one.expose_secret(), ten.expose_secret());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(derive_key(b"x", b"salt", 0), Err(AttemptError::Derivation(_))));
    }
}
