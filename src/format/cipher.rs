use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};

use crate::config::{BLOCK_SIZE, KEY_LEN};
use crate::error::AttemptError;

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256-CBC decryption without padding removal.
///
/// A wrong passphrase still yields a well-formed key, so the only failures
/// here come from the shape of the input: key or IV length and block
/// alignment of the ciphertext.
pub fn decrypt_cbc(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, AttemptError> {
    if key.len() != KEY_LEN {
        return Err(AttemptError::KeyLength(key.len()));
    }

    if iv.len() != BLOCK_SIZE {
        return Err(AttemptError::IvLength(iv.len()));
    }

    if ciphertext.is_empty() {
        return Err(AttemptError::EmptyPlaintext);
    }

    if !ciphertext.len().is_multiple_of(BLOCK_SIZE) {
        return Err(AttemptError::BlockAlignment(ciphertext.len()));
    }

    let decryptor = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| AttemptError::KeyLength(key.len()))?;

    let mut buffer = ciphertext.to_vec();
    let len = decryptor
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|_| AttemptError::BlockAlignment(ciphertext.len()))?
        .len();
    buffer.truncate(len);

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A F.2.6, CBC-AES256.Decrypt, first two blocks.
    const NIST_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_CIPHERTEXT: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d";
    const NIST_PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";

    #[test]
    fn test_nist_vector() {
        let key = hex::decode(NIST_KEY).unwrap();
        let iv = hex::decode(NIST_IV).unwrap();
        let ciphertext = hex::decode(NIST_CIPHERTEXT).unwrap();

        let plaintext = decrypt_cbc(&key, &iv, &ciphertext).unwrap();
        assert_eq!(hex::encode(plaintext), NIST_PLAINTEXT);
    }

    #[test]
    fn test_misaligned_ciphertext() {
        let key = [0u8; KEY_LEN];
        let iv = [0u8; BLOCK_SIZE];
        assert_eq!(decrypt_cbc(&key, &iv, &[0u8; 17]), Err(AttemptError::BlockAlignment(17)));
    }

    #[test]
    fn test_empty_ciphertext() {
        let key = [0u8; KEY_LEN];
        let iv = [0u8; BLOCK_SIZE];
        assert_eq!(decrypt_cbc(&key, &iv, &[]), Err(AttemptError::EmptyPlaintext));
    }

    #[test]
    fn test_bad_key_length() {
        let iv = [0u8; BLOCK_SIZE];
        assert_eq!(decrypt_cbc(&[0u8; 16], &iv, &[0u8; 16]), Err(AttemptError::KeyLength(16)));
    }

    #[test]
    fn test_empty_iv() {
        let key = [0u8; KEY_LEN];
        assert_eq!(decrypt_cbc(&key, &[], &[0u8; 16]), Err(AttemptError::IvLength(0)));
    }
}
