//! Subkey derivation and the blinding ratchet hash.
//!
//! Every per-hop key is separated from the shared secret by a labelled
//! HMAC-SHA256: the label is the HMAC key, the shared secret the
//! message. The ratchet hash `SHA256(compressed(E) || ss)` drives both
//! the ephemeral-key chain on the sender side and the next-blinding
//! computation on the receiver side; without a hop's shared secret the
//! chain cannot be walked backwards.

use hmac::{Hmac, Mac};
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};

use crate::SharedSecret;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation labels for [`subkey`].
pub mod labels {
    /// Per-hop payload encryption key.
    pub const RHO: &str = "rho";
    /// Per-hop identity-blinding tweak.
    pub const BLINDED_NODE_ID: &str = "blinded_node_id";
    /// Per-hop onion packet layer key.
    pub const HOP_DATA: &str = "hop_data";
}

/// Derive a 32-byte subkey: HMAC-SHA256 keyed by `label` over the
/// shared secret.
pub fn subkey(label: &str, ss: &SharedSecret) -> [u8; 32] {
    let Ok(mut mac) = HmacSha256::new_from_slice(label.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(ss.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Ratchet hash `SHA256(compressed(E) || ss)` linking one hop's
/// ephemeral key to the next.
pub fn blinding_ratchet_hash(ephemeral: &PublicKey, ss: &SharedSecret) -> [u8; 32] {
    let digest = Sha256::new()
        .chain_update(ephemeral.serialize())
        .chain_update(ss.as_bytes())
        .finalize();

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
