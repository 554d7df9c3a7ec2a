//! Operator-configured file map: hard-wires hosts to local icon files.
//!
//! Rules are `(pattern, path)` pairs checked in order against the normalized
//! origin string (`scheme://host[:port]`). The first matching rule wins and no
//! network access happens.

use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::config::FileMapRule;

use super::{ResolveContext, ResolveError, ResolveStep, ResolvedIcon, Resolver};

/// Serves icons straight from disk for hosts matching a configured pattern.
#[derive(Debug)]
pub struct FileMapResolver {
    rules: Vec<(Regex, PathBuf)>,
}

impl FileMapResolver {
    /// Compiles configured rules.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidRule`] for the first pattern that is not a valid regex.
    pub fn from_rules(rules: &[FileMapRule]) -> Result<Self, ResolveError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.path.clone()))
                    .map_err(|e| ResolveError::invalid_rule(&rule.pattern, &e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    /// Returns the path of the first rule matching `origin`.
    #[must_use]
    pub fn lookup(&self, origin: &str) -> Option<&PathBuf> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(origin))
            .map(|(_, path)| path)
    }
}

#[async_trait]
impl Resolver for FileMapResolver {
    fn name(&self) -> &'static str {
        "file_map"
    }

    #[tracing::instrument(skip(self, ctx), fields(resolver = "file_map"))]
    async fn resolve(&self, ctx: &ResolveContext) -> Result<ResolveStep, ResolveError> {
        let origin = ctx.target().origin.to_string();
        let Some(path) = self.lookup(&origin) else {
            return Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                &origin,
                "no file map rule matches",
            )));
        };

        debug!(path = %path.display(), "file map rule matched");
        match tokio::fs::read(path).await {
            Ok(bytes) if !bytes.is_empty() => Ok(ResolveStep::Icon(ResolvedIcon::new(
                bytes,
                self.name(),
                None,
            ))),
            Ok(_) => Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                &origin,
                &format!("mapped file {} is empty", path.display()),
            ))),
            Err(e) => Ok(ResolveStep::Failed(ResolveError::resolution_failed(
                &origin,
                &format!("cannot read mapped file {}: {e}", path.display()),
            ))),
        }
    }
}
