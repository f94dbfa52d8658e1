//! ChaCha20-Poly1305 AEAD encryption (RFC 8439).
//!
//! Hop payloads and onion layers are sealed with no associated data.
//! Every key in this codebase is derived fresh per message and per hop,
//! which is what makes the fixed [`ZERO_NONCE`] sound: no key is ever
//! used for a second encryption.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};

use crate::{CryptoError, Result};

/// Key size for ChaCha20-Poly1305 (256 bits = 32 bytes).
pub const KEY_SIZE: usize = 32;

/// Nonce size for ChaCha20-Poly1305 (96 bits = 12 bytes).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (128 bits = 16 bytes).
pub const TAG_SIZE: usize = 16;

/// The all-zero nonce used with single-use keys.
pub const ZERO_NONCE: [u8; NONCE_SIZE] = [0u8; NONCE_SIZE];

/// Encrypt `plaintext`, returning ciphertext with the appended 16-byte
/// authentication tag.
pub fn encrypt(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::AeadEncryption)
}

/// Decrypt `ciphertext` (tag appended), or fail if authentication does.
pub fn decrypt(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AeadDecryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [0x42u8; KEY_SIZE];
        let plaintext = b"blinded hop payload";

        let ciphertext = encrypt(&key, &ZERO_NONCE, plaintext).expect("encrypt");
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);

        let decrypted = decrypt(&key, &ZERO_NONCE, &ciphertext).expect("decrypt");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = encrypt(&[0x01u8; KEY_SIZE], &ZERO_NONCE, b"data").expect("encrypt");
        assert!(matches!(
            decrypt(&[0x02u8; KEY_SIZE], &ZERO_NONCE, &ciphertext).expect_err("must fail"),
            CryptoError::AeadDecryption
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = [0x01u8; KEY_SIZE];
        let mut ciphertext = encrypt(&key, &ZERO_NONCE, b"data").expect("encrypt");
        if let Some(byte) = ciphertext.first_mut() {
            *byte ^= 0x01;
        }
        assert!(decrypt(&key, &ZERO_NONCE, &ciphertext).is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let key = [0x42u8; KEY_SIZE];
        let ciphertext = encrypt(&key, &ZERO_NONCE, b"").expect("encrypt");
        assert_eq!(ciphertext.len(), TAG_SIZE);
        assert!(decrypt(&key, &ZERO_NONCE, &ciphertext).expect("decrypt").is_empty());
    }
}
