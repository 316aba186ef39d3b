//! Playlist Porter command-line entry point.
//!
//! Logs go to stderr so reports printed on stdout stay machine-readable.

use clap::Parser;
use playlist_porter::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_filter = if args.verbose {
        "playlist_porter=debug"
    } else {
        "playlist_porter=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    cli::run_command(&args)
}
