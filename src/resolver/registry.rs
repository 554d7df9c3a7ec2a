//! Resolver registry with the ordered resolution loop.
//!
//! The [`ResolverRegistry`] holds the strategies in registration order and
//! tries them one at a time until one yields an icon.

use tracing::{debug, info, warn};

use super::{ResolveContext, ResolveError, ResolveStep, ResolvedIcon, Resolver};

/// An ordered collection of strategies with the resolution loop.
///
/// Strategies run strictly sequentially in the order they were registered.
/// There is no speculative or parallel fetching.
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverRegistry {
    /// Creates an empty resolver registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Appends a strategy to the end of the chain.
    #[tracing::instrument(skip(self, resolver), fields(resolver_name))]
    pub fn register(&mut self, resolver: Box<dyn Resolver>) {
        tracing::Span::current().record("resolver_name", resolver.name());
        debug!(
            name = resolver.name(),
            position = self.resolvers.len(),
            "Registering resolver"
        );
        self.resolvers.push(resolver);
    }

    /// Returns the number of registered resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if no resolvers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Strategy names in chain order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Runs the chain for the request in `ctx`.
    ///
    /// 1. Tries each strategy in registration order
    /// 2. On `ResolveStep::Icon` → returns it
    /// 3. On `ResolveStep::Failed` or `Err` → logs and tries the next one
    /// 4. Returns `AllResolversFailed` if nothing succeeds
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::AllResolversFailed` if every strategy fails,
    /// including the degenerate case of an empty registry.
    #[tracing::instrument(skip(self, ctx), fields(origin = %ctx.target().origin))]
    pub async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolvedIcon, ResolveError> {
        let input = ctx.target().origin.to_string();
        let mut tried_count: usize = 0;

        for handler in &self.resolvers {
            tried_count += 1;
            debug!(resolver = handler.name(), input = %input, "Trying resolver");

            match handler.resolve(ctx).await {
                Ok(ResolveStep::Icon(icon)) => {
                    info!(
                        resolver = handler.name(),
                        bytes = icon.bytes.len(),
                        url = icon.url.as_deref().unwrap_or("-"),
                        "Resolution successful"
                    );
                    return Ok(icon);
                }
                Ok(ResolveStep::Failed(err)) => {
                    debug!(
                        resolver = handler.name(),
                        error = %err,
                        "Resolver failed, trying next"
                    );
                }
                Err(err) => {
                    warn!(
                        resolver = handler.name(),
                        error = %err,
                        "Resolver returned error"
                    );
                }
            }
        }

        Err(ResolveError::all_failed(&input, tried_count))
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("resolver_count", &self.resolvers.len())
            .field("resolvers", &self.names())
            .finish()
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
