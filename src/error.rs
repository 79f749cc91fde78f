//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`ResolveError`], [`ConfigError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use music_linker::error::{Error, Result};
//!
//! async fn run(url: &str) -> Result<()> {
//!     let service = ResolverService::new(config)?;  // Resolve errors auto-convert
//!     let result = service.resolve(url).await?;
//!     Ok(())
//! }
//! ```

use crate::config::ConfigError;
use crate::resolver::ResolveError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Link resolution error
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Input that isn't usable as a music link
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The resolution error underneath any context, if there is one.
    pub fn as_resolve(&self) -> Option<&ResolveError> {
        match self {
            Self::Resolve(e) => Some(e),
            Self::WithContext { source, .. } => source.as_resolve(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ResolveError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Resolve(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("not a link");
        assert!(err.to_string().contains("not a link"));
    }

    #[test]
    fn test_resolve_error_passes_through() {
        let err: Error = ResolveError::RateLimited.into();
        assert_eq!(err.to_string(), ResolveError::RateLimited.to_string());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ResolveError::NoMatches).context("while resolving");
        let msg = err.to_string();
        assert!(msg.contains("while resolving"));
        assert!(matches!(err.as_resolve(), Some(ResolveError::NoMatches)));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), ResolveError> =
            Err(ResolveError::Network("connection reset".to_string()));
        let with_ctx = result.with_context("additional context");
        let err = with_ctx.unwrap_err();
        assert!(err.to_string().contains("additional context"));
        assert!(err.as_resolve().is_some_and(ResolveError::is_upstream));
    }

    #[test]
    fn test_config_error_has_no_resolve_source() {
        let err = Error::from(ConfigError::NoConfigDir);
        assert!(err.as_resolve().is_none());
    }
}
