//! Favicon fallback chain.
//!
//! This module turns a normalized site URL into icon bytes by trying an
//! ordered list of independent strategies until one succeeds.
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait every strategy implements
//! - [`ResolverRegistry`] - Ordered collection of strategies with the resolution loop
//! - [`ResolveStep`] - Result enum from individual resolve operations
//! - [`ResolveContext`] - Per-request state shared by strategies (target, client, page)
//! - [`FileMapResolver`] - Operator-configured local files, no network
//! - [`HtmlLinkResolver`] - Icon `<link>` scraped from the page
//! - [`RootFaviconResolver`] - `{origin}/favicon.ico`
//! - [`RedirectedRootResolver`] - `favicon.ico` on the origin the page redirected to
//! - [`ExternalApiResolver`] - Third-party favicon services
//!
//! # Example
//!
//! ```no_run
//! use favicon_core::fetch::{FetchOptions, HttpClient};
//! use favicon_core::parser::normalize_url;
//! use favicon_core::resolver::{ResolveContext, ResolverRegistry, RootFaviconResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = ResolverRegistry::new();
//! registry.register(Box::new(RootFaviconResolver::new()));
//!
//! let client = HttpClient::new(FetchOptions::default())?;
//! let ctx = ResolveContext::new(normalize_url("example.com")?, client);
//! let icon = registry.resolve(&ctx).await?;
//! println!("{} bytes from {}", icon.bytes.len(), icon.source);
//! # Ok(())
//! # }
//! ```

mod error;
mod external;
mod file_map;
mod html_link;
mod redirected_root;
mod registry;
mod root_favicon;

pub use error::ResolveError;
pub use external::ExternalApiResolver;
pub use file_map::FileMapResolver;
pub use html_link::HtmlLinkResolver;
pub use redirected_root::RedirectedRootResolver;
pub use registry::ResolverRegistry;
pub use root_favicon::RootFaviconResolver;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::config::AppConfig;
use crate::fetch::{FetchResult, HttpClient};
use crate::parser::NormalizedUrl;

/// Builds the default resolver registry from configuration.
///
/// Order is fixed: file map, HTML link, root favicon, redirected-root
/// favicon, then one external API per configured template.
#[must_use]
pub fn build_default_resolver_registry(config: &AppConfig) -> ResolverRegistry {
    let mut registry = ResolverRegistry::new();

    if !config.file_map.is_empty() {
        match FileMapResolver::from_rules(&config.file_map) {
            Ok(resolver) => registry.register(Box::new(resolver)),
            Err(error) => warn!(
                error = %error,
                "File map resolver unavailable; continuing with network resolvers"
            ),
        }
    }

    registry.register(Box::new(HtmlLinkResolver::new()));
    registry.register(Box::new(RootFaviconResolver::new()));
    registry.register(Box::new(RedirectedRootResolver::new()));

    for (index, template) in config.fallback_apis.iter().enumerate() {
        registry.register(Box::new(ExternalApiResolver::new(
            format!("external_api_{}", index + 1),
            template.clone(),
        )));
    }
    registry
}

/// Icon bytes plus provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// Name of the strategy that produced them.
    pub source: String,
    /// Where the bytes came from, for network strategies.
    pub url: Option<String>,
}

impl ResolvedIcon {
    /// Creates a resolved icon.
    #[must_use]
    pub fn new(bytes: Vec<u8>, source: impl Into<String>, url: Option<String>) -> Self {
        Self {
            bytes,
            source: source.into(),
            url,
        }
    }
}

/// Result of a single strategy's attempt.
#[derive(Debug, Clone)]
pub enum ResolveStep {
    /// Icon found; the chain stops here.
    Icon(ResolvedIcon),
    /// This strategy produced nothing; the chain moves on.
    Failed(ResolveError),
}

/// Per-request state handed to every strategy.
///
/// The page fetch is shared: the HTML-link strategy and the redirected-root
/// strategy both need it, and it is performed at most once per request.
#[derive(Debug)]
pub struct ResolveContext {
    target: NormalizedUrl,
    client: HttpClient,
    page: OnceCell<FetchResult>,
}

impl ResolveContext {
    /// Creates a context for one resolution request.
    #[must_use]
    pub fn new(target: NormalizedUrl, client: HttpClient) -> Self {
        Self {
            target,
            client,
            page: OnceCell::new(),
        }
    }

    /// The normalized request.
    #[must_use]
    pub fn target(&self) -> &NormalizedUrl {
        &self.target
    }

    /// The HTTP client strategies fetch through.
    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Fetches the requested page (non-image) on first call and returns the cached result after.
    pub async fn page(&self) -> &FetchResult {
        self.page
            .get_or_init(|| self.client.fetch(self.target.page_url.as_str(), false))
            .await
    }
}

/// Trait that every favicon strategy implements.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via `Box<dyn Resolver>`.
/// Rust 2024 native async traits are not object-safe, so `async_trait` is required
/// for the registry pattern.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the strategy's name (e.g., "`html_link`", "`root_favicon`").
    fn name(&self) -> &str;

    /// Attempts to produce icon bytes for the request in `ctx`.
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError>;
}

/// Maps a failed fetch into a `Failed` step carrying the fetch error text.
pub(crate) fn failed_fetch(input: &str, result: &FetchResult) -> ResolveStep {
    let reason = result
        .error
        .as_ref()
        .map_or_else(|| "fetch failed".to_string(), ToString::to_string);
    ResolveStep::Failed(ResolveError::resolution_failed(input, &reason))
}
