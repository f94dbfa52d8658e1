//! shallot: construct and peel blinded onion-message routes.
//!
//! Usage:
//!   shallot create [--session-key <hex>] <nodeid>[/<scid>]...
//!   shallot onion [--session-key <hex>] <pubkey>/<hexpayload>...
//!   shallot unwrap [--first-node] <privkey> <onion> <blinding>
//!
//! `create` prints the initial blinding point and one
//! `<blindedId>/<framedPayload>` token per hop; `onion` assembles those
//! tokens into an onion packet; `unwrap` peels one layer with a hop's
//! private key. Every command either prints a complete artifact or
//! exits with status 1 and a message on stderr.

mod commands;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("shallot: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        Some("create") => commands::create::run(&args[1..]),
        Some("onion") => commands::onion::run(&args[1..]),
        Some("unwrap") => commands::unwrap::run(&args[1..]),
        Some(other) => anyhow::bail!("unknown command '{other}': expected create, onion or unwrap"),
        None => anyhow::bail!("you must specify create, onion or unwrap"),
    }
}
