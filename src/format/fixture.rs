//! Test fixtures: seals plaintext the way each export format was written.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use secrecy::ExposeSecret;

use super::{FormatKind, IvPolicy, SaltPolicy, ZERO_IV, derive_key};
use crate::config::BLOCK_SIZE;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Salt/IV block used by every sealed fixture.
pub const PREFIX: [u8; BLOCK_SIZE] = *b"\x9b\x11saltsalt\x00\xffiv\x42\x07";

pub const WALLET_JSON: &[u8] = br#"{"guid":"7a1f3c2e-0b5d-4e8a-9c6f-2d4b8e1a3f57","sharedKey":"c0ffee","keys":[{"addr":"1BoatSLRHtKNngkdXEeobR76b53LETtpyT"}]}"#;

/// Encrypts `plaintext` under `passphrase` in the layout of `kind`.
pub fn seal(kind: FormatKind, passphrase: &str, plaintext: &[u8]) -> Vec<u8> {
    let spec = kind.spec();

    let salt: &[u8] = match spec.salt {
        SaltPolicy::Prefix => &PREFIX,
        SaltPolicy::Empty => &[],
    };
    let iv = match spec.iv {
        IvPolicy::Prefix => PREFIX,
        IvPolicy::FixedZero => ZERO_IV,
        IvPolicy::Empty => panic!("cannot seal without an iv"),
    };

    let key = derive_key(passphrase.as_bytes(), salt, spec.iterations).unwrap();
    let body = Aes256CbcEnc::new_from_slices(key.expose_secret(), &iv).unwrap().encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    if spec.consumes_prefix() {
        let mut sealed = PREFIX.to_vec();
        sealed.extend_from_slice(&body);
        sealed
    } else {
        body
    }
}

/// [`seal`] followed by the base64 armour of an export file.
pub fn seal_base64(kind: FormatKind, passphrase: &str, plaintext: &[u8]) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    STANDARD.encode(seal(kind, passphrase, plaintext))
}
