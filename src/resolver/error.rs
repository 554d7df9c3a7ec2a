//! Error types for favicon resolution.
//!
//! This module defines structured errors for the fallback chain,
//! following the What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Errors that can occur while resolving a favicon.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// A single strategy could not produce an icon
    #[error("resolution failed for '{input}': {reason}\n  Suggestion: {suggestion}")]
    ResolutionFailed {
        /// The site or URL the strategy worked on
        input: String,
        /// Why the strategy failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// A file-map rule carries a pattern that is not a valid regex
    #[error("invalid file map pattern '{pattern}': {reason}\n  Suggestion: Fix the regex in the file_map section of the config")]
    InvalidRule {
        /// The offending pattern
        pattern: String,
        /// Regex compiler message
        reason: String,
    },

    /// Every registered strategy failed
    #[error(
        "all resolvers failed for '{input}': tried {tried_count} resolver(s)\n  Suggestion: The default icon will be served instead"
    )]
    AllResolversFailed {
        /// The site all strategies failed on
        input: String,
        /// Number of strategies that were tried
        tried_count: usize,
    },
}

impl ResolveError {
    /// Creates a `ResolutionFailed` error.
    #[must_use]
    pub fn resolution_failed(input: &str, reason: &str) -> Self {
        Self::ResolutionFailed {
            input: input.to_string(),
            reason: reason.to_string(),
            suggestion: "The next strategy in the chain will be tried".to_string(),
        }
    }

    /// Creates an `InvalidRule` error.
    #[must_use]
    pub fn invalid_rule(pattern: &str, reason: &str) -> Self {
        Self::InvalidRule {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `AllResolversFailed` error.
    #[must_use]
    pub fn all_failed(input: &str, tried_count: usize) -> Self {
        Self::AllResolversFailed {
            input: input.to_string(),
            tried_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_resolution_failed_message() {
        let err = ResolveError::resolution_failed("http://example.com", "HTTP 404");
        let msg = err.to_string();
        assert!(msg.contains("http://example.com"), "should contain input");
        assert!(msg.contains("HTTP 404"), "should contain reason");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_resolve_error_all_failed_message() {
        let err = ResolveError::all_failed("http://example.com", 6);
        let msg = err.to_string();
        assert!(msg.contains("6 resolver(s)"), "should contain tried count");
        assert!(msg.contains("default icon"));
    }

    #[test]
    fn test_resolve_error_invalid_rule_message() {
        let err = ResolveError::invalid_rule("([", "unclosed group");
        let msg = err.to_string();
        assert!(msg.contains("(["));
        assert!(msg.contains("file_map"));
    }

    #[test]
    fn test_resolve_error_clone() {
        let err = ResolveError::all_failed("x", 1);
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
