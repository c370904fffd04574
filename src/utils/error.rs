//! Centralized error handling for the storefront crate
//!
//! Library code returns [`SiteResult`] built on `thiserror`; the `benjis`
//! binary wraps these in `anyhow` with context at the boundary.
//!
//! Page behaviors themselves never fail: a missing element is a silent skip,
//! not an error. Only configuration, selectors, time input and terminal I/O
//! produce a [`SiteError`].

use crate::dom::SelectorError;
use thiserror::Error;

/// Errors that can occur outside the page behaviors
#[derive(Error, Debug)]
pub enum SiteError {
    /// Configuration values that cannot be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSS selector that could not be parsed
    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// Root margin string that could not be parsed
    #[error("Invalid root margin '{input}': {message}")]
    RootMargin { input: String, message: String },

    /// Date/time input that could not be parsed
    #[error("Invalid time '{input}': {message}")]
    TimeParse { input: String, message: String },
}

impl SiteError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SiteError::Config(message.into())
    }
}

/// Result type alias for storefront operations
pub type SiteResult<T> = Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_config_error_display() {
        let err = SiteError::config("close hour before open hour");
        assert_eq!(
            err.to_string(),
            "Configuration error: close hour before open hour"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SiteError = io.into();
        assert_matches!(err, SiteError::Io(_));
    }

    #[test]
    fn test_time_parse_display() {
        let err = SiteError::TimeParse {
            input: "tomorrow".to_string(),
            message: "expected YYYY-MM-DD HH:MM".to_string(),
        };
        assert!(err.to_string().contains("tomorrow"));
    }
}
