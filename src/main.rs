//! tickit - a to-do list for the terminal
//!
//! Keeps tasks in a local JSON store and lists them with overdue work first.

use clap::Parser;
use tickit::cli::Cli;
use tickit::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}

/// Tracing is opt-in via RUST_LOG (or --verbose) and always writes to stderr.
/// Invalid or huge filters are ignored so startup never fails on them.
fn init_tracing(verbose: bool) {
    let default = if verbose { "tickit=debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
