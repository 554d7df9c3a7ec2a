//! URL normalization: turns whatever the caller typed into a canonical site origin.

use std::fmt;

use tracing::{debug, trace};
use url::Url;

use super::error::{MAX_URL_LENGTH, ParseError};

/// Canonical `scheme://host[:port]` identity of a site.
///
/// Only constructed through [`normalize`] / [`normalize_url`], so the host is
/// always non-empty. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Builds an origin from an already parsed URL. Returns `None` when the URL has no host.
    pub(crate) fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|host| !host.is_empty())?;
        Some(Self {
            scheme: url.scheme().to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            port: url.port(),
        })
    }

    /// URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Lower-cased host name (IPv6 literals keep their brackets).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit non-default port, if the input carried one.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Well-known `/favicon.ico` location for this origin.
    #[must_use]
    pub fn favicon_url(&self) -> String {
        format!("{self}/favicon.ico")
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// A normalized request: the full page URL to scrape plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Absolute page URL (scheme added when the input had none).
    pub page_url: Url,
    /// Canonical origin of `page_url`.
    pub origin: Origin,
}

/// Normalizes `input` into an [`Origin`].
///
/// # Errors
///
/// Returns [`ParseError`] when no valid host can be extracted, even after
/// retrying with an `http://` prefix.
///
/// # Examples
///
/// ```
/// use favicon_core::parser::normalize;
///
/// let origin = normalize("example.com").unwrap();
/// assert_eq!(origin.to_string(), "http://example.com");
/// assert!(normalize("://bad").is_err());
/// ```
pub fn normalize(input: &str) -> Result<Origin, ParseError> {
    normalize_url(input).map(|normalized| normalized.origin)
}

/// Normalizes `input` into a page URL plus origin.
///
/// Parsing is attempted as-is first. If that fails or yields no host, and the
/// input does not already start with `http://` / `https://`, it is retried
/// once with `http://` prepended.
///
/// # Errors
///
/// Returns [`ParseError`] for over-long input, non-web schemes, or input with
/// no extractable host.
#[tracing::instrument(level = "trace", fields(input_len = input.len()))]
pub fn normalize_url(input: &str) -> Result<NormalizedUrl, ParseError> {
    let trimmed = input.trim();
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(trimmed));
    }
    if trimmed.is_empty() {
        return Err(ParseError::malformed(input, "empty input"));
    }

    let first_attempt = Url::parse(trimmed);
    let parsed = match first_attempt {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => url,
        _ if !has_web_scheme_prefix(trimmed) => {
            trace!(input = %trimmed, "retrying parse with http:// prefix");
            let prefixed = format!("http://{trimmed}");
            Url::parse(&prefixed).map_err(|e| ParseError::malformed(trimmed, &e.to_string()))?
        }
        Ok(_) => return Err(ParseError::no_host(trimmed)),
        Err(e) => return Err(ParseError::malformed(trimmed, &e.to_string())),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ParseError::unsupported_scheme(trimmed, scheme)),
    }

    let origin = Origin::from_url(&parsed).ok_or_else(|| ParseError::no_host(trimmed))?;
    debug!(origin = %origin, "normalized request URL");

    Ok(NormalizedUrl {
        page_url: parsed,
        origin,
    })
}

fn has_web_scheme_prefix(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_host_prepends_http() {
        let origin = normalize("example.com").unwrap();
        assert_eq!(origin.to_string(), "http://example.com");
        assert_eq!(origin.scheme(), "http");
        assert_eq!(origin.host(), "example.com");
        assert_eq!(origin.port(), None);
    }

    #[test]
    fn test_normalize_rejects_missing_host() {
        let err = normalize("://bad").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn test_normalize_keeps_https_and_drops_path() {
        let origin = normalize("https://Example.COM/some/page?x=1#frag").unwrap();
        assert_eq!(origin.to_string(), "https://example.com");
    }

    #[test]
    fn test_normalize_keeps_explicit_port() {
        let origin = normalize("http://localhost:8080/index.html").unwrap();
        assert_eq!(origin.to_string(), "http://localhost:8080");
        assert_eq!(origin.port(), Some(8080));
    }

    #[test]
    fn test_normalize_default_port_is_omitted() {
        let origin = normalize("https://example.com:443/").unwrap();
        assert_eq!(origin.to_string(), "https://example.com");
    }

    #[test]
    fn test_normalize_bare_host_with_port_is_retried() {
        // "example.com:8080" parses as scheme "example.com" with no host.
        let origin = normalize("example.com:8080").unwrap();
        assert_eq!(origin.to_string(), "http://example.com:8080");
    }

    #[test]
    fn test_normalize_bare_host_with_path_keeps_page_url() {
        let normalized = normalize_url("www.example.org/blog/post").unwrap();
        assert_eq!(normalized.origin.to_string(), "http://www.example.org");
        assert_eq!(
            normalized.page_url.as_str(),
            "http://www.example.org/blog/post"
        );
    }

    #[test]
    fn test_normalize_rejects_non_web_scheme() {
        let err = normalize("ftp://example.com/file").unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_normalize_rejects_empty_and_whitespace() {
        assert!(normalize("").is_err());
        assert!(normalize("   ").is_err());
    }

    #[test]
    fn test_normalize_rejects_too_long() {
        let long = format!("example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize(&long),
            Err(ParseError::UrlTooLong { .. })
        ));
    }

    #[test]
    fn test_normalize_http_prefix_is_not_retried() {
        assert!(normalize("http://").is_err());
        assert!(normalize("https://:8080").is_err());
    }

    #[test]
    fn test_favicon_url_appends_well_known_path() {
        let origin = normalize("https://example.com:8443/a/b").unwrap();
        assert_eq!(origin.favicon_url(), "https://example.com:8443/favicon.ico");
    }
}
