//! Sender-side key-blinding ratchet.
//!
//! For nodes P(0..N-1) and an initial ephemeral keypair (e, E):
//!
//! ```text
//! ss(i)        = ECDH(e(i), P(i))
//! B(i)         = P(i)                       for i == 0
//!              = HMAC("blinded_node_id", ss(i)) * P(i)   otherwise
//! rho(i)       = HMAC("rho", ss(i))
//! h(i)         = SHA256(compressed(E(i)) || ss(i))
//! E(i+1)       = h(i) * E(i),  e(i+1) = h(i) * e(i)
//! ```
//!
//! Hop 0 already knows its own identity, so it is the only hop whose
//! published identity is untweaked. Recovering E(i-1) from E(i) would
//! require h(i-1), which depends on hop i-1's secret material.

use shallot_crypto::{ec, kdf, Curve, PublicKey, SecretKey};
use tracing::trace;

use crate::{payload, Result, RouteError};

/// One entry of a blinded route.
#[derive(Clone)]
pub struct BlindedHop {
    /// The identity this hop is addressed by on the wire.
    pub blinded_id: PublicKey,
    /// The hop's outer payload bytes; empty for the terminal hop.
    pub payload: Vec<u8>,
}

impl BlindedHop {
    /// The payload with its transport framing byte count prepended.
    pub fn framed_payload(&self) -> Vec<u8> {
        payload::frame(&self.payload)
    }
}

/// A constructed blinded route.
pub struct BlindedRoute {
    /// The initial blinding point E(0), handed to the first hop.
    pub blinding: PublicKey,
    /// Per-hop blinded identities and payloads, in route order.
    pub hops: Vec<BlindedHop>,
}

/// Run the blinding ratchet over `nodes` and build every hop payload.
///
/// The caller supplies the initial ephemeral secret, which keeps the
/// whole construction deterministic and reproducible. Any failing
/// curve operation aborts with no partial route.
pub fn build_route(
    curve: &Curve,
    session_key: &SecretKey,
    nodes: &[PublicKey],
) -> Result<BlindedRoute> {
    if nodes.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    let blinding = curve.public_from_secret(session_key);

    let mut blinded_ids = Vec::with_capacity(nodes.len());
    let mut rhos = Vec::with_capacity(nodes.len());
    let mut e = *session_key;

    for (i, node) in nodes.iter().enumerate() {
        let ephemeral = curve.public_from_secret(&e);
        let ss = ec::shared_secret(&e, node);

        let tweak = kdf::subkey(kdf::labels::BLINDED_NODE_ID, &ss);
        let blinded_id = if i == 0 { *node } else { curve.tweak_public(node, &tweak)? };
        trace!(hop = i, blinded_id = %hex::encode(blinded_id.serialize()), "blinded hop identity");

        blinded_ids.push(blinded_id);
        rhos.push(kdf::subkey(kdf::labels::RHO, &ss));

        let h = kdf::blinding_ratchet_hash(&ephemeral, &ss);
        e = ec::tweak_secret(&e, &h)?;
    }

    let mut hops = Vec::with_capacity(nodes.len());
    for (i, blinded_id) in blinded_ids.into_iter().enumerate() {
        let hop_payload = match nodes.get(i + 1) {
            Some(next) => payload::build_hop_payload(&rhos[i], next)?,
            None => Vec::new(),
        };
        hops.push(BlindedHop { blinded_id, payload: hop_payload });
    }

    Ok(BlindedRoute { blinding, hops })
}
