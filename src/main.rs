//! algoviz CLI - step-by-step algorithm walkthroughs
//!
//! Command-line interface for listing, printing and playing step sequences.

use std::process::ExitCode;

use algoviz::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    run_cli(Args::parse())
}
