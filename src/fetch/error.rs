//! Error types for the fetch module.
//!
//! Every variant here is recoverable from the resolver's point of view: a
//! failed fetch simply moves the fallback chain on to its next strategy.

use thiserror::Error;

/// Errors that can occur while fetching a page or icon.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Final HTTP status outside the accepted 200..=399 range.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Redirect chain exceeded the configured hop limit.
    #[error("too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects {
        /// The URL the chain started from.
        url: String,
        /// Maximum hops allowed.
        limit: usize,
    },

    /// A redirect status arrived without a usable `Location` header.
    #[error("HTTP {status} redirect without usable Location from {url}")]
    BadRedirect {
        /// The URL that answered with the redirect.
        url: String,
        /// The redirect status code.
        status: u16,
    },

    /// Response was fetched but is not an image.
    #[error("response from {url} is not an image: {reason}")]
    NotAnImage {
        /// The URL whose body failed validation.
        url: String,
        /// Which check failed.
        reason: String,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a deadline-exceeded error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a redirect-limit error.
    pub fn too_many_redirects(url: impl Into<String>, limit: usize) -> Self {
        Self::TooManyRedirects {
            url: url.into(),
            limit,
        }
    }

    /// Creates a bad-redirect error.
    pub fn bad_redirect(url: impl Into<String>, status: u16) -> Self {
        Self::BadRedirect {
            url: url.into(),
            status,
        }
    }

    /// Creates an image validation error.
    pub fn not_an_image(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotAnImage {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
