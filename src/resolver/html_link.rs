//! Icon `<link>` strategy: scrape the page, then fetch the linked image.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::parser::{extract_icon_href, resolve_link};

use super::{ResolveContext, ResolveError, ResolveStep, ResolvedIcon, Resolver, failed_fetch};

/// Fetches the page, finds the first icon `<link>`, and fetches its target as an image.
///
/// The `href` is resolved against the page's effective URL, so links on a
/// page reached through redirects point where the browser would look.
#[derive(Debug, Default)]
pub struct HtmlLinkResolver;

impl HtmlLinkResolver {
    /// Creates a new `HtmlLinkResolver`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for HtmlLinkResolver {
    fn name(&self) -> &'static str {
        "html_link"
    }

    #[tracing::instrument(skip(self, ctx), fields(resolver = "html_link"))]
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError> {
        let page_url = ctx.target().page_url.as_str();
        let page = ctx.page().await;
        if !page.is_ok() {
            return Ok(failed_fetch(page_url, page));
        }

        let html = String::from_utf8_lossy(&page.body);
        let Some(href) = extract_icon_href(&html) else {
            return Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                page_url,
                "no icon <link> in page",
            )));
        };

        let base =
            Url::parse(&page.effective_url).unwrap_or_else(|_| ctx.target().page_url.clone());
        let Some(icon_url) = resolve_link(&href, &base) else {
            return Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                page_url,
                &format!("icon href '{href}' is not fetchable"),
            )));
        };
        debug!(href = %href, icon_url = %icon_url, "found icon link");

        let icon = ctx.client().fetch(&icon_url, true).await;
        if !icon.is_ok() {
            return Ok(failed_fetch(&icon_url, &icon));
        }
        Ok(ResolveStep::Icon(ResolvedIcon::new(
            icon.body,
            self.name(),
            Some(icon.effective_url),
        )))
    }
}
