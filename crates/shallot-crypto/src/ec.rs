//! secp256k1 keypairs, Diffie-Hellman and multiplicative tweaks.
//!
//! Identities and blinding points are 33-byte compressed points; secret
//! material is a 32-byte scalar. Point validity is checked when bytes
//! are parsed, so later curve operations only fail on degenerate tweak
//! results, which abort the whole operation.

use secp256k1::{ecdh, All, PublicKey, Scalar, Secp256k1, SecretKey};
use zeroize::Zeroize;

use crate::{CryptoError, Result};

/// Process-wide curve context.
///
/// Construct once at startup and share read-only; it holds no per-call
/// state and is safe to use from concurrent operations.
pub struct Curve {
    secp: Secp256k1<All>,
}

impl Curve {
    /// Create a new curve context.
    pub fn new() -> Self {
        Self { secp: Secp256k1::new() }
    }

    /// Compute the public point for a secret scalar.
    pub fn public_from_secret(&self, secret: &SecretKey) -> PublicKey {
        PublicKey::from_secret_key(&self.secp, secret)
    }

    /// Multiply a public point by a 32-byte tweak scalar.
    ///
    /// Fails if the tweak is outside the curve order or the product is
    /// the point at infinity.
    pub fn tweak_public(&self, point: &PublicKey, tweak: &[u8; 32]) -> Result<PublicKey> {
        let scalar = Scalar::from_be_bytes(*tweak).map_err(|_| CryptoError::TweakOutOfRange)?;
        point.mul_tweak(&self.secp, &scalar).map_err(CryptoError::DegenerateTweak)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiply a secret scalar by a 32-byte tweak scalar.
pub fn tweak_secret(secret: &SecretKey, tweak: &[u8; 32]) -> Result<SecretKey> {
    let scalar = Scalar::from_be_bytes(*tweak).map_err(|_| CryptoError::TweakOutOfRange)?;
    secret.mul_tweak(&scalar).map_err(CryptoError::DegenerateTweak)
}

/// An ECDH shared secret: SHA-256 of the compressed shared point.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret {
    bytes: [u8; 32],
}

impl SharedSecret {
    /// Get the raw bytes of the shared secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

/// Diffie-Hellman between a secret scalar and a public point.
pub fn shared_secret(secret: &SecretKey, point: &PublicKey) -> SharedSecret {
    let shared = ecdh::SharedSecret::new(point, secret);
    SharedSecret { bytes: shared.secret_bytes() }
}

/// Parse a 33-byte compressed public point.
pub fn public_from_slice(bytes: &[u8]) -> Result<PublicKey> {
    PublicKey::from_slice(bytes).map_err(CryptoError::InvalidPublicKey)
}

/// Parse a 32-byte secret scalar.
pub fn secret_from_slice(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(bytes).map_err(CryptoError::InvalidSecretKey)
}
