//! The `create` command: run the blinding ratchet over a node list and
//! print the route.

use anyhow::{bail, Context};
use shallot_crypto::{ec, Curve, PublicKey};
use shallot_route::build_route;
use tracing::debug;

/// Parse one `<nodeid>[/<scid>]` argument.
fn parse_node_arg(arg: &str) -> anyhow::Result<PublicKey> {
    let (node_hex, scid) = match arg.split_once('/') {
        Some((node_hex, scid)) => (node_hex, Some(scid)),
        None => (arg, None),
    };

    let bytes =
        hex::decode(node_hex).with_context(|| format!("'{node_hex}' is not valid hex"))?;
    let node = ec::public_from_slice(&bytes)
        .with_context(|| format!("'{node_hex}' is not a valid public key"))?;

    if let Some(scid) = scid {
        hex::decode(scid)
            .with_context(|| format!("'{scid}' is not a valid short channel id"))?;
        // TODO: carry the suffix into the encrypted payload as
        // next_short_channel_id once its construction is settled.
        debug!(scid, "ignoring short channel id suffix");
    }

    Ok(node)
}

pub fn run(args: &[String]) -> anyhow::Result<()> {
    let (session_hex, rest) = super::take_value_flag(args, "--session-key")?;
    if rest.is_empty() {
        bail!("create requires at least one node id");
    }

    let nodes = rest
        .iter()
        .map(|arg| parse_node_arg(arg))
        .collect::<anyhow::Result<Vec<PublicKey>>>()?;
    let session_key = super::session_key(session_hex)?;

    let curve = Curve::new();
    let route = build_route(&curve, &session_key, &nodes)?;

    println!("Blinding: {}", hex::encode(route.blinding.serialize()));
    let hops: Vec<String> = route
        .hops
        .iter()
        .map(|hop| {
            format!(
                "{}/{}",
                hex::encode(hop.blinded_id.serialize()),
                hex::encode(hop.framed_payload())
            )
        })
        .collect();
    println!("{}", hops.join(" "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shallot_crypto::ec::secret_from_slice;

    fn node_hex() -> String {
        let curve = Curve::new();
        let secret = secret_from_slice(&[0x11u8; 32]).expect("valid secret");
        hex::encode(curve.public_from_secret(&secret).serialize())
    }

    #[test]
    fn test_parse_plain_node() {
        let arg = node_hex();
        assert!(parse_node_arg(&arg).is_ok());
    }

    #[test]
    fn test_parse_node_with_scid_suffix() {
        let arg = format!("{}/0102030405060708", node_hex());
        assert!(parse_node_arg(&arg).is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        assert!(parse_node_arg("not-hex").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_point() {
        assert!(parse_node_arg(&"00".repeat(33)).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_scid_suffix() {
        let arg = format!("{}/nothex", node_hex());
        assert!(parse_node_arg(&arg).is_err());
    }
}
