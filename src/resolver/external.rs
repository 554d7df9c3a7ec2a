//! Third-party favicon services used as the last resort before the default icon.

use async_trait::async_trait;
use tracing::debug;

use super::{ResolveContext, ResolveError, ResolveStep, ResolvedIcon, Resolver};

/// Delegates to an external favicon API described by a URL template.
///
/// Templates may contain `{url}` (the percent-encoded origin) and `{host}`
/// (the bare host name). The response must carry a 2xx/3xx status and a
/// non-empty body; the bytes are not image-validated.
#[derive(Debug, Clone)]
pub struct ExternalApiResolver {
    name: String,
    template: String,
}

impl ExternalApiResolver {
    /// Creates a resolver named `name` for the given URL template.
    #[must_use]
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Expands the template for the request in `ctx`.
    #[must_use]
    pub fn render(&self, ctx: &ResolveContext) -> String {
        let origin = &ctx.target().origin;
        self.template
            .replace("{url}", &urlencoding::encode(&origin.to_string()))
            .replace("{host}", origin.host())
    }
}

#[async_trait]
impl Resolver for ExternalApiResolver {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip(self, ctx), fields(resolver = %self.name))]
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError> {
        let api_url = self.render(ctx);
        debug!(api_url = %api_url, "querying external favicon API");

        let result = ctx.client().fetch(&api_url, false).await;
        if !result.is_ok() {
            return Ok(super::failed_fetch(&api_url, &result));
        }
        if result.body.is_empty() {
            return Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                &api_url,
                "external API returned an empty body",
            )));
        }
        Ok(ResolveStep::Icon(ResolvedIcon::new(
            result.body,
            self.name.clone(),
            Some(result.effective_url),
        )))
    }
}
