use secrecy::{ExposeSecret, SecretString};

/// A candidate passphrase, kept out of `Debug` output and zeroed on drop.
pub struct Passphrase {
    inner: SecretString,
}

impl Passphrase {
    pub fn new(passphrase: &str) -> Self {
        Self { inner: SecretString::from(passphrase.to_owned()) }
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.inner.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Passphrase([... {} bytes ...])", self.as_bytes().len())
    }
}
