//! Command-line interface for music-linker.
//!
//! This module provides CLI commands for resolving and classifying music
//! links and for checking the local configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
