//! Account secret handling and at-rest encryption
//!
//! The secret never appears in `Debug` output, logs, or any serialized
//! form of the account configuration. For persistence it is encrypted
//! under a caller-supplied key phrase: PBKDF2-HMAC-SHA256 (600k rounds,
//! random 16-byte salt) derives the key, XChaCha20-Poly1305 seals the
//! value, and the armored result is base64(salt || nonce || ciphertext).
//! The rounds and layout are part of the persisted format; changing them
//! breaks previously stored secrets.

use crate::{CoreError, CoreResult};
use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;
const PBKDF2_ROUNDS: u32 = 600_000;

/// An account password/credential.
///
/// Owned by the caller and borrowed by the mail client for the lifetime
/// of that client; there is no getter outside this crate.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// True when the secret is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// Encrypt the secret under a key phrase for at-rest storage
    pub fn encrypt(&self, key_phrase: &str) -> CoreResult<String> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key(key_phrase, &salt);
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|e| CoreError::SecretCrypto(e.to_string()))?;

        let ciphertext = cipher
            .encrypt(XNonce::from_slice(&nonce), self.0.as_bytes())
            .map_err(|_| CoreError::SecretCrypto("encryption failed".to_string()))?;

        let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64_STANDARD.encode(blob))
    }

    /// Decrypt a previously encrypted secret.
    ///
    /// A wrong key phrase fails AEAD verification and returns an error;
    /// it can never yield the original value.
    pub fn decrypt(ciphertext: &str, key_phrase: &str) -> CoreResult<Secret> {
        let blob = BASE64_STANDARD
            .decode(ciphertext)
            .map_err(|e| CoreError::SecretCrypto(format!("invalid base64: {}", e)))?;

        if blob.len() < SALT_LEN + NONCE_LEN {
            return Err(CoreError::SecretCrypto("ciphertext too short".to_string()));
        }
        let (salt, rest) = blob.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let key = derive_key(key_phrase, salt);
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|e| CoreError::SecretCrypto(e.to_string()))?;

        let plain = cipher.decrypt(XNonce::from_slice(nonce), sealed).map_err(|_| {
            CoreError::SecretCrypto("decryption failed (wrong key phrase or corrupt data)".to_string())
        })?;

        let value = String::from_utf8(plain)
            .map_err(|_| CoreError::SecretCrypto("decrypted secret is not UTF-8".to_string()))?;
        Ok(Secret(value))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Secret::new(value)
    }
}

fn derive_key(key_phrase: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(key_phrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let secret = Secret::new("idkmypsswd");
        let sealed = secret.encrypt("a key phrase").unwrap();
        let restored = Secret::decrypt(&sealed, "a key phrase").unwrap();
        assert_eq!(restored.expose(), "idkmypsswd");
    }

    #[test]
    fn test_wrong_key_phrase_never_yields_original() {
        let secret = Secret::new("idkmypsswd");
        let sealed = secret.encrypt("right phrase").unwrap();

        match Secret::decrypt(&sealed, "wrong phrase") {
            Err(CoreError::SecretCrypto(_)) => {}
            Ok(restored) => assert_ne!(restored.expose(), "idkmypsswd"),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_encryption_is_salted() {
        let secret = Secret::new("x");
        let a = secret.encrypt("key").unwrap();
        let b = secret.encrypt("key").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_decrypt_rejects_garbage() {
        assert!(Secret::decrypt("%%%not base64%%%", "key").is_err());
        assert!(Secret::decrypt("c2hvcnQ=", "key").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::new("idkmypsswd");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("idkmypsswd"));
    }
}
