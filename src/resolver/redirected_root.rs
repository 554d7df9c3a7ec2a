//! `/favicon.ico` on the origin the page redirected to.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::parser::Origin;

use super::root_favicon::fetch_root_favicon;
use super::{ResolveContext, ResolveError, ResolveStep, Resolver};

/// Retries the root favicon against the page's effective origin.
///
/// Only applies when the page fetch ended on a different origin than the one
/// requested, e.g. `example.com` → `www.example.com`. The page result is shared
/// with [`super::HtmlLinkResolver`], so no extra page fetch happens.
#[derive(Debug, Default)]
pub struct RedirectedRootResolver;

impl RedirectedRootResolver {
    /// Creates a new `RedirectedRootResolver`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for RedirectedRootResolver {
    fn name(&self) -> &'static str {
        "redirected_root_favicon"
    }

    #[tracing::instrument(skip(self, ctx), fields(resolver = "redirected_root_favicon"))]
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError> {
        let requested = &ctx.target().origin;
        let page = ctx.page().await;

        let effective = Url::parse(&page.effective_url)
            .ok()
            .and_then(|url| Origin::from_url(&url));
        let Some(effective) = effective.filter(|origin| origin != requested) else {
            return Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                &requested.to_string(),
                "page did not redirect to another origin",
            )));
        };

        debug!(from = %requested, to = %effective, "page redirected across origins");
        Ok(fetch_root_favicon(ctx.client(), &effective, self.name()).await)
    }
}
