//! Music Linker - find a song, album or artist on every streaming service.
//!
//! Give it a Spotify, Apple Music, Tidal or YouTube Music link and it asks a
//! grounded generative search service for the equivalent links on the other
//! platforms, printing them as they are discovered.

pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;
#[cfg(test)]
pub mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so `--json` output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_linker=info".parse()?))
        .init();

    cli::run_command(&args)
}
