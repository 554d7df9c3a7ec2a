//! Error types for configuration loading and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("missing required config value `{key}`\n  Suggestion: {suggestion}")]
    Missing {
        /// Config key
        key: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// A setting is present but out of range or malformed
    #[error("invalid config value for `{key}`: {value}. Expected: {expected}")]
    Invalid {
        /// Config key
        key: String,
        /// Offending value as written
        value: String,
        /// Accepted values
        expected: String,
    },

    /// Config file could not be read or written
    #[error("config file I/O failed for '{path}': {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML decoder error
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be encoded back to TOML
    #[error("failed to serialize config: {source}")]
    Serialize {
        /// TOML encoder error
        #[source]
        source: toml::ser::Error,
    },

    /// The default icon file is unreadable or empty
    #[error(
        "cannot load default icon '{path}': {reason}\n  Suggestion: Point default_icon_path at a readable, non-empty image"
    )]
    DefaultIcon {
        /// Configured path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

impl ConfigError {
    /// Creates a `Missing` error.
    #[must_use]
    pub fn missing(key: &str, suggestion: &str) -> Self {
        Self::Missing {
            key: key.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates an `Invalid` error.
    #[must_use]
    pub fn invalid(key: &str, value: impl ToString, expected: &str) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an `Io` error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
