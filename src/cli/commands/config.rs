//! Config file commands.

use std::process::ExitCode;

use crate::config;
use crate::error::ResultExt;

/// Show the config file location and whether resolution can run
pub fn cmd_check_config(init: bool) -> anyhow::Result<ExitCode> {
    println!("Checking configuration...\n");

    let Some(path) = config::config_path() else {
        println!("✗ Config directory: could not be determined");
        return Ok(ExitCode::FAILURE);
    };

    if path.exists() {
        println!("✓ Config file: {}", path.display());
    } else if init {
        let saved = config::save(&config::Config::default())
            .with_context("Failed to write default config")?;
        println!("✓ Config file: {} (created)", saved.display());
    } else {
        println!("✗ Config file: {} (not found)", path.display());
        println!("  Run with --init to create one");
    }

    let config = config::load();
    println!();
    println!("Search:");
    println!("  Model:     {}", config.search.model);
    println!("  Endpoint:  {}", config.search.base_url);
    println!("  Streaming: {}", if config.search.streaming { "on" } else { "off" });
    println!("  Timeout:   {}s", config.search.timeout_secs);

    println!();
    println!("API Keys:");
    let from_env = std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.trim().is_empty());
    let from_file = config
        .credentials
        .gemini_api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    if from_env {
        println!("✓ GEMINI_API_KEY: set");
    } else if from_file {
        println!("✓ gemini_api_key: set in config file");
    } else {
        println!("✗ GEMINI_API_KEY: not set");
        println!("  Get one at: https://aistudio.google.com/apikey");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
