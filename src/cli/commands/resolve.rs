//! Link resolution and classification commands.

use std::process::ExitCode;
use tokio::runtime::Runtime;

use crate::config;
use crate::error::{self, ResultExt};
use crate::resolver::{
    PatternRegistry, Platform, ResolutionResult, ResolveError, ResolverService,
};

use super::EXIT_NO_MATCHES;

/// Flags for `resolve`
pub struct ResolveOptions<'a> {
    pub api_key: Option<&'a str>,
    pub model: Option<&'a str>,
    pub one_shot: bool,
    pub json: bool,
}

/// Resolve a link into links on the other platforms
pub fn cmd_resolve(rt: &Runtime, url: &str, options: &ResolveOptions<'_>) -> anyhow::Result<ExitCode> {
    let url = url.trim();
    if url.is_empty() {
        return Err(error::Error::invalid_input("no link given").into());
    }

    let config = config::load();
    let streaming = config.search.streaming && !options.one_shot;

    let service = match build_service(&config, options) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!("Get a key at: https://aistudio.google.com/apikey");
            eprintln!("Then use: --api-key YOUR_KEY, set GEMINI_API_KEY, or run `check-config --init`");
            return Ok(ExitCode::FAILURE);
        }
    };

    if service.classify(url).is_none() {
        tracing::warn!(input = url, "Input is not a recognised music link, searching anyway");
    }

    let mut progress = Progress::new();
    let outcome = rt.block_on(async {
        let resolution = async {
            if streaming {
                service
                    .resolve_streaming(url, |snapshot| {
                        for line in progress.update(&snapshot) {
                            status_line(options.json, &line);
                        }
                    })
                    .await
            } else {
                status_line(options.json, "Searching...");
                service.resolve(url).await
            }
        };

        tokio::select! {
            result = resolution => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    });

    let Some(result) = outcome else {
        eprintln!();
        eprintln!("✗ Cancelled");
        return Ok(ExitCode::from(130));
    };

    match result.with_context(format!("Failed to resolve {}", url)) {
        Ok(result) => {
            if options.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!();
                print_card(&result);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report_failure(&e),
    }
}

/// Show which platform a link belongs to
pub fn cmd_classify(url: &str) -> anyhow::Result<ExitCode> {
    let registry = PatternRegistry::new()?;
    let url = url.trim();

    let Some(platform) = registry.classify(url) else {
        match registry.platform_for_host(url) {
            Some(platform) => {
                println!("✗ {} link, but not a track, album or artist page", platform);
            }
            None => println!("✗ Not a recognised music link"),
        }
        return Ok(ExitCode::FAILURE);
    };

    println!("✓ {}", platform);
    if let Some(deep_link) = registry.extract_first_match(platform, url) {
        println!("  Deep link: {}", deep_link);
    }
    Ok(ExitCode::SUCCESS)
}

fn build_service(
    config: &config::Config,
    options: &ResolveOptions<'_>,
) -> error::Result<ResolverService> {
    let mut resolver_config = config.resolver_config(options.api_key);
    if let Some(model) = options.model {
        resolver_config.model = model.to_string();
    }
    tracing::debug!(model = %resolver_config.model, "Building resolver");
    Ok(ResolverService::new(resolver_config)?)
}

fn report_failure(err: &error::Error) -> anyhow::Result<ExitCode> {
    match err.as_resolve() {
        Some(ResolveError::NoMatches) => {
            println!();
            println!("✗ No links found on any platform.");
            println!("  The search came back without a usable track, album or artist link.");
            Ok(ExitCode::from(EXIT_NO_MATCHES))
        }
        Some(e) if e.is_upstream() => {
            eprintln!("✗ Search service error: {}", e);
            Ok(ExitCode::FAILURE)
        }
        _ => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Progress lines go to stderr when stdout is reserved for JSON.
fn status_line(json: bool, line: &str) {
    if json {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

fn print_card(result: &ResolutionResult) {
    if !result.title.is_empty() {
        println!("  Title:  {}", result.title);
    }
    if !result.artist.is_empty() {
        println!("  Artist: {}", result.artist);
    }
    println!("  Type:   {}", result.kind.as_str());
    println!();
    for platform in Platform::ALL {
        match result.link_for(platform) {
            Some(link) => println!("  ✓ {:<14} {}", platform.display_name(), link.url),
            None => println!("  ✗ {:<14} not found", platform.display_name()),
        }
    }
}

/// Turns successive snapshots into "what's new" lines.
struct Progress {
    seen: Vec<Platform>,
    title_shown: bool,
}

impl Progress {
    fn new() -> Self {
        Self {
            seen: Vec::new(),
            title_shown: false,
        }
    }

    fn update(&mut self, snapshot: &ResolutionResult) -> Vec<String> {
        let mut lines = Vec::new();

        if !self.title_shown && !snapshot.title.is_empty() && !snapshot.artist.is_empty() {
            self.title_shown = true;
            lines.push(format!("Found: {} - {}", snapshot.artist, snapshot.title));
        }

        for link in &snapshot.links {
            if !self.seen.contains(&link.platform) {
                self.seen.push(link.platform);
                lines.push(format!("  + {}: {}", link.platform, link.url));
            }
        }
        lines
    }
}
