//! Receiver-side unwrap of a single route layer.
//!
//! A hop holds its real key `k` and receives a blinding point `E` next
//! to the onion packet. From `ss = ECDH(k, E)` it derives the payload
//! key and its identity tweak; the onion shared secret is then computed
//! against the packet's ephemeral key with the tweak applied, because
//! the sender addressed the packet to the tweaked identity while the
//! hop can only run Diffie-Hellman with its real key. The designated
//! first hop was never tweaked and skips that step.

use shallot_crypto::{ec, kdf, Curve, PublicKey, SecretKey};
use shallot_packet::OnionPacket;
use shallot_wire::tlv::TlvField;
use tracing::debug;

use crate::payload::{self, EncMsgPayload};
use crate::{Result, RouteError};

/// The outcome of unwrapping one hop.
pub enum UnwrappedHop {
    /// The route ends at this hop.
    Terminal,
    /// The message continues to another hop.
    Forward {
        /// Decrypted inner stream bytes.
        contents: Vec<u8>,
        /// The decoded inner payload.
        inner: EncMsgPayload,
        /// Unrecognized inner fields, preserved verbatim.
        inner_extra: Vec<TlvField>,
        /// Blinding point to hand to the next hop.
        next_blinding: PublicKey,
        /// Serialized onion packet for the next hop.
        next_onion: Vec<u8>,
    },
}

/// Unwrap one layer: parse the packet, derive this hop's secrets,
/// process the packet, decrypt the payload and compute the next
/// blinding point.
///
/// `first_hop` marks the explicitly designated route entry whose
/// identity the sender never tweaked.
pub fn peel_hop(
    curve: &Curve,
    node_key: &SecretKey,
    onion: &[u8],
    blinding: &PublicKey,
    first_hop: bool,
) -> Result<UnwrappedHop> {
    let packet = OnionPacket::parse(onion)?;

    let route_ss = ec::shared_secret(node_key, blinding);
    let rho = kdf::subkey(kdf::labels::RHO, &route_ss);
    let tweak = kdf::subkey(kdf::labels::BLINDED_NODE_ID, &route_ss);

    let effective_ephemeral = if first_hop {
        *packet.ephemeral()
    } else {
        curve.tweak_public(packet.ephemeral(), &tweak)?
    };
    let onion_ss = ec::shared_secret(node_key, &effective_ephemeral);

    let processed = packet.process(curve, &onion_ss)?;

    let outer_bytes = payload::read_frame(&processed.payload)?;
    let (outer, _) = payload::decode_hop_payload(outer_bytes)?;

    if processed.is_terminal && outer.enctlv.is_none() {
        debug!("route terminates at this hop");
        return Ok(UnwrappedHop::Terminal);
    }

    let enctlv = outer.enctlv.ok_or(RouteError::MissingEnctlv)?;
    let contents = payload::open_enctlv(&rho, &enctlv)?;
    let (inner, inner_extra) = payload::decode_encmsg(&contents)?;

    let h = kdf::blinding_ratchet_hash(blinding, &route_ss);
    let next_blinding = curve.tweak_public(blinding, &h)?;

    Ok(UnwrappedHop::Forward {
        contents,
        inner,
        inner_extra,
        next_blinding,
        next_onion: processed.next.serialize(),
    })
}
