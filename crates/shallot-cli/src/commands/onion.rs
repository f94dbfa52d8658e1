//! The `onion` command: assemble an onion packet from the
//! `<pubkey>/<framedPayload>` tokens printed by `create`.

use anyhow::{bail, Context};
use shallot_crypto::{ec, Curve, PublicKey};
use shallot_packet::OnionPacket;

/// Parse one `<pubkey>/<hexpayload>` hop token.
fn parse_hop_arg(arg: &str) -> anyhow::Result<(PublicKey, Vec<u8>)> {
    let (id_hex, payload_hex) = arg
        .split_once('/')
        .with_context(|| format!("'{arg}' is not of the form <pubkey>/<hexpayload>"))?;

    let bytes = hex::decode(id_hex).with_context(|| format!("'{id_hex}' is not valid hex"))?;
    let id = ec::public_from_slice(&bytes)
        .with_context(|| format!("'{id_hex}' is not a valid public key"))?;
    let payload = hex::decode(payload_hex)
        .with_context(|| format!("'{payload_hex}' is not a valid hex payload"))?;

    Ok((id, payload))
}

pub fn run(args: &[String]) -> anyhow::Result<()> {
    let (session_hex, rest) = super::take_value_flag(args, "--session-key")?;
    if rest.is_empty() {
        bail!("onion requires at least one <pubkey>/<hexpayload> hop");
    }

    let hops = rest
        .iter()
        .map(|arg| parse_hop_arg(arg))
        .collect::<anyhow::Result<Vec<(PublicKey, Vec<u8>)>>>()?;
    let session_key = super::session_key(session_hex)?;

    let curve = Curve::new();
    let packet = OnionPacket::create(&curve, &session_key, &hops)?;
    println!("{}", hex::encode(packet.serialize()));

    Ok(())
}
