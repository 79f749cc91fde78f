//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `resolve`: Link resolution and offline classification
//! - `config`: Config file inspection and initialisation

mod config;
mod resolve;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;

pub use config::cmd_check_config;
pub use resolve::{cmd_classify, cmd_resolve};

/// Exit code when the search ran fine but found no links.
pub(crate) const EXIT_NO_MATCHES: u8 = 2;

/// Music Linker CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find the same track, album or artist on the other streaming services
    Resolve {
        /// Spotify, Apple Music, Tidal or YouTube Music link
        url: String,
        /// Gemini API key (or set GEMINI_API_KEY env var)
        #[arg(short, long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Gemini model to use (default from config file)
        #[arg(short, long)]
        model: Option<String>,
        /// Wait for the whole answer instead of streaming it
        #[arg(long)]
        one_shot: bool,
        /// Print the final result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which platform a link belongs to (no network)
    Classify {
        /// Link to classify
        url: String,
    },
    /// Show config file location and whether an API key is available
    CheckConfig {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Resolve {
            url,
            api_key,
            model,
            one_shot,
            json,
        } => {
            let rt = Runtime::new()?;
            let options = resolve::ResolveOptions {
                api_key: api_key.as_deref(),
                model: model.as_deref(),
                one_shot: *one_shot,
                json: *json,
            };
            cmd_resolve(&rt, url, &options)
        }
        Commands::Classify { url } => cmd_classify(url),
        Commands::CheckConfig { init } => cmd_check_config(*init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "music-linker",
            "resolve",
            "https://open.spotify.com/track/abc123",
            "--api-key",
            "k",
            "--one-shot",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve {
                url,
                api_key,
                model,
                one_shot,
                json,
            } => {
                assert_eq!(url, "https://open.spotify.com/track/abc123");
                assert_eq!(api_key.as_deref(), Some("k"));
                assert!(model.is_none());
                assert!(one_shot);
                assert!(!json);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["music-linker", "check-config", "--init"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig { init: true }));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["music-linker"]).is_err());
    }
}
