//! # shallot-crypto
//!
//! Cryptographic primitives for the shallot onion-message tooling.
//!
//! - [`ec`] - secp256k1 keypairs, ECDH and multiplicative tweaks
//! - [`kdf`] - HMAC-SHA256 subkey derivation and the blinding ratchet hash
//! - [`aead`] - ChaCha20-Poly1305 AEAD encryption
//!
//! All operations are synchronous and deterministic given their inputs.
//! The one piece of shared state is the [`ec::Curve`] context, built once
//! at process start and shared read-only afterwards.

pub mod aead;
pub mod ec;
pub mod kdf;

pub use ec::{Curve, SharedSecret};
pub use secp256k1::{PublicKey, SecretKey};

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The bytes do not encode a valid compressed curve point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(secp256k1::Error),

    /// The bytes do not encode a valid secret scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(secp256k1::Error),

    /// A tweak scalar was not within the curve order.
    #[error("tweak scalar out of range")]
    TweakOutOfRange,

    /// A multiplicative tweak produced a degenerate result.
    #[error("degenerate tweak result: {0}")]
    DegenerateTweak(secp256k1::Error),

    /// AEAD encryption failed.
    #[error("AEAD encryption failed")]
    AeadEncryption,

    /// AEAD decryption failed (authentication tag mismatch).
    #[error("AEAD decryption failed")]
    AeadDecryption,
}

/// Convenience result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
