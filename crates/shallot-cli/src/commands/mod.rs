//! Command implementations, one submodule per subcommand.

pub mod create;
pub mod onion;
pub mod unwrap;

use anyhow::Context;
use shallot_crypto::{ec, SecretKey};

/// Split a bare flag out of the argument list.
pub(crate) fn take_flag(args: &[String], name: &str) -> (bool, Vec<String>) {
    let present = args.iter().any(|a| a.as_str() == name);
    let rest = args.iter().filter(|a| a.as_str() != name).cloned().collect();
    (present, rest)
}

/// Split a `--flag <value>` pair out of the argument list.
pub(crate) fn take_value_flag(
    args: &[String],
    name: &str,
) -> anyhow::Result<(Option<String>, Vec<String>)> {
    let mut value = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.as_str() == name {
            let v = iter.next().with_context(|| format!("{name} requires a value"))?;
            value = Some(v.clone());
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((value, rest))
}

/// Resolve the initial ephemeral secret: the injected hex value when
/// given, otherwise fresh OS randomness.
pub(crate) fn session_key(hex_value: Option<String>) -> anyhow::Result<SecretKey> {
    match hex_value {
        Some(h) => {
            let bytes =
                hex::decode(&h).with_context(|| format!("Invalid session key hex '{h}'"))?;
            ec::secret_from_slice(&bytes).with_context(|| format!("Invalid session key '{h}'"))
        }
        None => Ok(SecretKey::new(&mut rand::rngs::OsRng)),
    }
}
