//! Well-known `/favicon.ico` strategy.

use async_trait::async_trait;

use crate::fetch::HttpClient;
use crate::parser::Origin;

use super::{ResolveContext, ResolveError, ResolveStep, ResolvedIcon, Resolver, failed_fetch};

/// Fetches `{origin}/favicon.ico` as an image.
#[derive(Debug, Default)]
pub struct RootFaviconResolver;

impl RootFaviconResolver {
    /// Creates a new `RootFaviconResolver`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Fetches the root favicon of `origin`, labelling the result with `source`.
pub(crate) async fn fetch_root_favicon(
    client: &HttpClient,
    origin: &Origin,
    source: &str,
) -> ResolveStep {
    let url = origin.favicon_url();
    let result = client.fetch(&url, true).await;
    if result.is_ok() {
        ResolveStep::Icon(ResolvedIcon::new(
            result.body,
            source,
            Some(result.effective_url),
        ))
    } else {
        failed_fetch(&url, &result)
    }
}

#[async_trait]
impl Resolver for RootFaviconResolver {
    fn name(&self) -> &'static str {
        "root_favicon"
    }

    #[tracing::instrument(skip(self, ctx), fields(resolver = "root_favicon"))]
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError> {
        Ok(fetch_root_favicon(ctx.client(), &ctx.target().origin, self.name()).await)
    }
}
