//! The `unwrap` command: peel one route layer with a hop's private key.

use anyhow::{bail, Context};
use shallot_crypto::{ec, Curve};
use shallot_route::{peel_hop, UnwrappedHop};

pub fn run(args: &[String]) -> anyhow::Result<()> {
    let (first_hop, rest) = super::take_flag(args, "--first-node");
    let [privkey_hex, onion_hex, blinding_hex] = rest.as_slice() else {
        bail!("unwrap requires privkey, onion and blinding");
    };

    let privkey_bytes = hex::decode(privkey_hex)
        .with_context(|| format!("Invalid private key hex '{privkey_hex}'"))?;
    let privkey = ec::secret_from_slice(&privkey_bytes)
        .with_context(|| format!("Invalid private key '{privkey_hex}'"))?;

    let onion =
        hex::decode(onion_hex).with_context(|| format!("Invalid onion '{onion_hex}'"))?;

    let blinding_bytes = hex::decode(blinding_hex)
        .with_context(|| format!("Invalid blinding hex '{blinding_hex}'"))?;
    let blinding = ec::public_from_slice(&blinding_bytes)
        .with_context(|| format!("Invalid blinding '{blinding_hex}'"))?;

    let curve = Curve::new();
    match peel_hop(&curve, &privkey, &onion, &blinding, first_hop)? {
        UnwrappedHop::Terminal => println!("TERMINAL"),
        UnwrappedHop::Forward { contents, next_blinding, next_onion, .. } => {
            println!("Contents: {}", hex::encode(&contents));
            println!("Next blinding: {}", hex::encode(next_blinding.serialize()));
            println!("Next onion: {}", hex::encode(&next_onion));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert!(run(&args(&["aa", "bb"])).is_err());
    }

    #[test]
    fn test_rejects_bad_private_key_hex() {
        let err = run(&args(&["zz", "00", &"02".repeat(33)])).expect_err("must fail");
        assert!(err.to_string().contains("Invalid private key hex"));
    }

    #[test]
    fn test_rejects_bad_blinding_point() {
        let err = run(&args(&[&"11".repeat(32), "00", &"00".repeat(33)]))
            .expect_err("must fail");
        assert!(err.to_string().contains("Invalid blinding"));
    }
}
