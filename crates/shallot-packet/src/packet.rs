//! Onion packet construction and per-hop processing.

use shallot_crypto::{aead, ec, kdf, Curve, PublicKey, SecretKey, SharedSecret};
use shallot_wire::bigsize;
use tracing::trace;

use crate::{PacketError, Result};

/// Current packet version byte.
pub const VERSION: u8 = 0;

/// Ceiling on the hop data section, in bytes.
pub const HOP_DATA_MAX: usize = 65536;

/// Version byte plus compressed ephemeral point.
const PRELUDE_LEN: usize = 1 + 33;

/// An onion packet: a version byte, the current ephemeral point, and
/// the remaining stack of encrypted hop layers.
#[derive(Clone)]
pub struct OnionPacket {
    ephemeral: PublicKey,
    hop_data: Vec<u8>,
}

/// The result of peeling one layer off a packet.
pub struct ProcessedPacket {
    /// This hop's payload, still carrying its length framing.
    pub payload: Vec<u8>,
    /// The packet to forward, with the ratcheted ephemeral key.
    pub next: OnionPacket,
    /// Whether no further layers remain after this hop.
    pub is_terminal: bool,
}

impl OnionPacket {
    /// The ephemeral point the current hop runs Diffie-Hellman against.
    pub fn ephemeral(&self) -> &PublicKey {
        &self.ephemeral
    }

    /// Build a packet over `hops` of (recipient point, framed payload).
    ///
    /// Each payload must be exactly one length frame as produced by the
    /// hop payload builder. The session key seeds the ephemeral chain;
    /// hop i+1's ephemeral is hop i's multiplied by the ratchet hash of
    /// hop i's shared secret.
    pub fn create(
        curve: &Curve,
        session_key: &SecretKey,
        hops: &[(PublicKey, Vec<u8>)],
    ) -> Result<Self> {
        if hops.is_empty() {
            return Err(PacketError::EmptyRoute);
        }
        for (_, payload) in hops {
            check_framing(payload)?;
        }

        // Walk the ephemeral chain forward, keeping each hop's layer key.
        let mut layer_keys = Vec::with_capacity(hops.len());
        let mut e = *session_key;
        for (point, _) in hops {
            let ephemeral = curve.public_from_secret(&e);
            let ss = ec::shared_secret(&e, point);
            layer_keys.push(kdf::subkey(kdf::labels::HOP_DATA, &ss));
            e = ec::tweak_secret(&e, &kdf::blinding_ratchet_hash(&ephemeral, &ss))?;
        }

        // Seal layers innermost-first.
        let mut hop_data = Vec::new();
        for ((_, payload), key) in hops.iter().zip(&layer_keys).rev() {
            let mut plaintext = payload.clone();
            plaintext.extend_from_slice(&hop_data);
            hop_data = aead::encrypt(key, &aead::ZERO_NONCE, &plaintext)?;
        }
        if hop_data.len() > HOP_DATA_MAX {
            return Err(PacketError::TooLarge { len: hop_data.len(), max: HOP_DATA_MAX });
        }

        trace!(hops = hops.len(), bytes = hop_data.len(), "assembled onion packet");
        Ok(Self { ephemeral: curve.public_from_secret(session_key), hop_data })
    }

    /// Parse a serialized packet.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PRELUDE_LEN {
            return Err(PacketError::TooShort { len: bytes.len() });
        }
        if bytes[0] != VERSION {
            return Err(PacketError::UnknownVersion(bytes[0]));
        }
        let ephemeral = ec::public_from_slice(&bytes[1..PRELUDE_LEN])?;
        let hop_data = bytes[PRELUDE_LEN..].to_vec();
        if hop_data.len() > HOP_DATA_MAX {
            return Err(PacketError::TooLarge { len: hop_data.len(), max: HOP_DATA_MAX });
        }
        Ok(Self { ephemeral, hop_data })
    }

    /// Serialize the packet to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PRELUDE_LEN + self.hop_data.len());
        out.push(VERSION);
        out.extend_from_slice(&self.ephemeral.serialize());
        out.extend_from_slice(&self.hop_data);
        out
    }

    /// Peel one layer using the shared secret the caller derived for
    /// this hop. Authentication failure is fatal; no partial result is
    /// produced.
    pub fn process(&self, curve: &Curve, ss: &SharedSecret) -> Result<ProcessedPacket> {
        let key = kdf::subkey(kdf::labels::HOP_DATA, ss);
        let plaintext = aead::decrypt(&key, &aead::ZERO_NONCE, &self.hop_data)?;

        let mut cursor = plaintext.as_slice();
        let len = bigsize::get(&mut cursor)?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        shallot_wire::take(&mut cursor, len)?;
        let consumed = plaintext.len() - cursor.len();
        let payload = plaintext[..consumed].to_vec();
        let rest = cursor.to_vec();
        let is_terminal = rest.is_empty();

        let h = kdf::blinding_ratchet_hash(&self.ephemeral, ss);
        let next_ephemeral = curve.tweak_public(&self.ephemeral, &h)?;

        trace!(payload_len = len, is_terminal, "peeled onion layer");
        Ok(ProcessedPacket {
            payload,
            next: OnionPacket { ephemeral: next_ephemeral, hop_data: rest },
            is_terminal,
        })
    }
}

/// Require `payload` to be exactly one length frame.
fn check_framing(payload: &[u8]) -> Result<()> {
    let mut cursor = payload;
    let len = bigsize::get(&mut cursor).map_err(|_| PacketError::BadFraming)?;
    if u64::try_from(cursor.len()) != Ok(len) {
        return Err(PacketError::BadFraming);
    }
    Ok(())
}
