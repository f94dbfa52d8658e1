//! Per-hop payload TLV schemas and the `enctlv` build/open pair.
//!
//! The outer payload a hop sees on the wire carries a single `enctlv`
//! field: the AEAD-sealed inner stream. The inner stream names the next
//! node and leaves room for forward-compatible fields, which are kept
//! opaque when unrecognized. Transport framing prepends a bigsize byte
//! count to the outer stream; the terminal hop's payload is empty and
//! frames to the single byte `0x00`.

use shallot_crypto::{aead, ec, PublicKey};
use shallot_wire::tlv::{self, TlvField, TlvRecordType};
use shallot_wire::{bigsize, WireError};

use crate::{Result, RouteError};

/// Outer hop payload: at most one `enctlv` field.
#[derive(Default, Debug)]
pub struct HopPayload {
    /// AEAD ciphertext plus tag of the inner stream.
    pub enctlv: Option<Vec<u8>>,
}

/// Inner (decrypted) payload fields.
#[derive(Default, Debug)]
pub struct EncMsgPayload {
    /// Reserved extension point; decoded when peers send it, never
    /// emitted by route construction.
    pub next_short_channel_id: Option<u64>,
    /// The real identity of the next hop.
    pub next_node_id: Option<PublicKey>,
}

fn enctlv_encode(r: &HopPayload) -> Option<Vec<u8>> {
    r.enctlv.clone()
}

fn enctlv_decode(r: &mut HopPayload, value: &[u8]) -> shallot_wire::Result<()> {
    r.enctlv = Some(value.to_vec());
    Ok(())
}

fn next_scid_encode(r: &EncMsgPayload) -> Option<Vec<u8>> {
    r.next_short_channel_id.map(|scid| scid.to_be_bytes().to_vec())
}

fn next_scid_decode(r: &mut EncMsgPayload, value: &[u8]) -> shallot_wire::Result<()> {
    let raw: [u8; 8] = value.try_into().map_err(|_| WireError::InvalidRecord {
        name: "next_short_channel_id",
        reason: format!("expected 8 bytes, got {}", value.len()),
    })?;
    r.next_short_channel_id = Some(u64::from_be_bytes(raw));
    Ok(())
}

fn next_node_id_encode(r: &EncMsgPayload) -> Option<Vec<u8>> {
    r.next_node_id.map(|id| id.serialize().to_vec())
}

fn next_node_id_decode(r: &mut EncMsgPayload, value: &[u8]) -> shallot_wire::Result<()> {
    let id = ec::public_from_slice(value).map_err(|e| WireError::InvalidRecord {
        name: "next_node_id",
        reason: e.to_string(),
    })?;
    r.next_node_id = Some(id);
    Ok(())
}

/// Schema for the outer hop payload stream.
pub const HOP_PAYLOAD_TYPES: &[TlvRecordType<HopPayload>] = &[TlvRecordType {
    typ: 4,
    name: "enctlv",
    encode: enctlv_encode,
    decode: enctlv_decode,
}];

/// Schema for the inner (decrypted) stream.
pub const ENCMSG_TYPES: &[TlvRecordType<EncMsgPayload>] = &[
    TlvRecordType {
        typ: 2,
        name: "next_short_channel_id",
        encode: next_scid_encode,
        decode: next_scid_decode,
    },
    TlvRecordType {
        typ: 4,
        name: "next_node_id",
        encode: next_node_id_encode,
        decode: next_node_id_decode,
    },
];

/// Build a non-terminal hop's outer payload bytes: the inner stream
/// naming `next_node_id`, sealed under `rho` into an `enctlv` field.
pub fn build_hop_payload(rho: &[u8; 32], next_node_id: &PublicKey) -> Result<Vec<u8>> {
    let inner = EncMsgPayload { next_node_id: Some(*next_node_id), ..Default::default() };
    let mut inner_bytes = Vec::new();
    tlv::encode_stream(&mut inner_bytes, ENCMSG_TYPES, &inner, &[]);

    let enctlv = aead::encrypt(rho, &aead::ZERO_NONCE, &inner_bytes)?;

    let outer = HopPayload { enctlv: Some(enctlv) };
    let mut outer_bytes = Vec::new();
    tlv::encode_stream(&mut outer_bytes, HOP_PAYLOAD_TYPES, &outer, &[]);
    Ok(outer_bytes)
}

/// Decrypt an `enctlv` value with this hop's `rho` key.
///
/// Authentication failure is fatal: tampering or a wrong-recipient
/// unwrap, never a recoverable condition.
pub fn open_enctlv(rho: &[u8; 32], enctlv: &[u8]) -> Result<Vec<u8>> {
    if enctlv.len() < aead::TAG_SIZE {
        return Err(RouteError::EnctlvTooShort { len: enctlv.len() });
    }
    Ok(aead::decrypt(rho, &aead::ZERO_NONCE, enctlv)?)
}

/// Prepend the transport framing byte count.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = bigsize::encode(payload.len() as u64);
    out.extend_from_slice(payload);
    out
}

/// Strip the transport framing, requiring the count to cover exactly
/// the remaining bytes.
pub fn read_frame(framed: &[u8]) -> Result<&[u8]> {
    let mut cursor = framed;
    let len = bigsize::get(&mut cursor)?;
    if u64::try_from(cursor.len()) != Ok(len) {
        return Err(RouteError::FramingMismatch);
    }
    Ok(cursor)
}

/// Decode an outer payload stream, keeping unknown fields.
pub fn decode_hop_payload(bytes: &[u8]) -> Result<(HopPayload, Vec<TlvField>)> {
    let mut record = HopPayload::default();
    let unknown = tlv::decode_stream(HOP_PAYLOAD_TYPES, bytes, &mut record)?;
    Ok((record, unknown))
}

/// Decode an inner payload stream, keeping unknown fields.
pub fn decode_encmsg(bytes: &[u8]) -> Result<(EncMsgPayload, Vec<TlvField>)> {
    let mut record = EncMsgPayload::default();
    let unknown = tlv::decode_stream(ENCMSG_TYPES, bytes, &mut record)?;
    Ok((record, unknown))
}
