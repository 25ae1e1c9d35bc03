// src/bin/rback.rs
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rback_core::cli::{handlers, Cli};
use rback_core::exit::RbackExit;

fn main() -> RbackExit {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match handlers::handle_render(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => RbackExit::from_error(&e),
    }
}

/// Logs go to stderr so stdout carries only the graph. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
