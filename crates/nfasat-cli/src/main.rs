#![doc = include_str!("../README.md")]

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> miette::Result<()> {
    // stdout carries only the verdict.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::check::run_check_command(
        cli.file,
        cli.solver,
        cli.timeout,
        cli.dump_smt,
        cli.format,
        cli.max_input_bytes,
    )
}
