//! # shallot-packet
//!
//! The mix-net onion packet that frames per-hop payloads.
//!
//! The route-blinding core treats this crate as a collaborator with a
//! three-call contract: [`OnionPacket::parse`], [`OnionPacket::process`]
//! (with an externally derived shared secret) and
//! [`OnionPacket::serialize`]. The sender side additionally has
//! [`OnionPacket::create`].
//!
//! Hop data is a stack of AEAD layers: each layer's plaintext is that
//! hop's length-framed payload followed by the next layer's ciphertext,
//! sealed under a key derived from the hop's shared secret. The packet
//! ephemeral key ratchets between hops by
//! `E(i+1) = SHA256(compressed(E(i)) || ss(i)) * E(i)`, so `process`
//! can compute the next packet from the supplied shared secret alone.
//! Packet size shrinks as layers are peeled; the constant-size
//! HMAC-chained construction is deliberately out of scope here.

mod packet;

pub use packet::{OnionPacket, ProcessedPacket, HOP_DATA_MAX, VERSION};

use shallot_crypto::CryptoError;
use shallot_wire::WireError;

/// Error types for onion packet handling.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// Fewer bytes than the fixed packet prelude.
    #[error("packet too short: {len} bytes")]
    TooShort { len: usize },

    /// Unsupported packet version byte.
    #[error("unknown packet version {0}")]
    UnknownVersion(u8),

    /// Hop data above the size ceiling.
    #[error("hop data too large: {len} bytes, at most {max}")]
    TooLarge { len: usize, max: usize },

    /// A route with no hops cannot be packetized.
    #[error("empty route")]
    EmptyRoute,

    /// A hop payload was not a single well-formed length frame.
    #[error("malformed hop payload framing")]
    BadFraming,

    /// Cryptographic failure from shallot-crypto.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Wire decoding failure inside a decrypted layer.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),
}

/// Convenience result type for packet operations.
pub type Result<T> = std::result::Result<T, PacketError>;
