//! # shallot-route
//!
//! Blinded route construction and single-hop peeling for onion
//! messages.
//!
//! - [`blinding`] - the sender-side key-blinding ratchet producing a
//!   [`blinding::BlindedRoute`]
//! - [`payload`] - per-hop TLV payload schemas and the `enctlv`
//!   build/open operations
//! - [`peel`] - the receiver-side unwrap of one route layer
//!
//! A hop that receives a blinding point `E` derives
//! `ss = ECDH(k, E)`, a payload key `rho = HMAC("rho", ss)` and an
//! identity tweak `HMAC("blinded_node_id", ss)`. The sender published
//! that hop's identity multiplied by the same tweak, so only the hop
//! itself can link the blinded identity to its real key, and each hop
//! learns nothing beyond the identity of its successor.

pub mod blinding;
pub mod payload;
pub mod peel;

pub use blinding::{build_route, BlindedHop, BlindedRoute};
pub use peel::{peel_hop, UnwrappedHop};

use shallot_crypto::CryptoError;
use shallot_packet::PacketError;
use shallot_wire::WireError;

/// Error types for route construction and peeling.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// A route needs at least one node.
    #[error("route must contain at least one node")]
    EmptyRoute,

    /// The framing length did not cover the remaining payload bytes.
    #[error("hop payload framing length mismatch")]
    FramingMismatch,

    /// A non-terminal payload arrived without an enctlv field.
    #[error("no enctlv field in hop payload")]
    MissingEnctlv,

    /// The enctlv field cannot even hold an authentication tag.
    #[error("enctlv field too short: {len} bytes")]
    EnctlvTooShort { len: usize },

    /// Cryptographic failure from shallot-crypto.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// TLV decoding failure.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// Onion packet failure.
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),
}

/// Convenience result type for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;
