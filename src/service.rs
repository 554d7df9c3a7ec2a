//! Request-level orchestration: normalize, consult the cache, resolve, fall
//! back to the default icon, and store the result.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheError, DiskCache};
use crate::config::{AppConfig, ConfigError, DefaultIcon};
use crate::fetch::{FetchError, HttpClient};
use crate::parser::{ParseError, normalize_url};
use crate::resolver::{ResolveContext, ResolverRegistry, build_default_resolver_registry};

/// Errors surfaced to callers of [`FaviconService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested URL has no extractable host (client error)
    #[error(transparent)]
    InvalidUrl(#[from] ParseError),

    /// The cache could not be written (server error)
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Startup configuration is missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The outbound HTTP client could not be built
    #[error(transparent)]
    Client(#[from] FetchError),
}

/// Bytes handed back to the caller plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedIcon {
    /// Icon bytes (real favicon or the default icon).
    pub bytes: Vec<u8>,
    /// Strategy that produced a freshly resolved icon; `None` for cache hits and defaults.
    pub source: Option<String>,
    /// Served from the disk cache.
    pub from_cache: bool,
    /// The bytes are the configured default icon.
    pub is_default: bool,
}

/// The favicon pipeline as one callable unit.
#[derive(Debug)]
pub struct FaviconService {
    registry: ResolverRegistry,
    client: HttpClient,
    cache: DiskCache,
    default_icon: DefaultIcon,
    ttl: Option<Duration>,
}

impl FaviconService {
    /// Assembles a service from explicit parts.
    ///
    /// `ttl = None` disables the cache entirely: no reads and no writes.
    #[must_use]
    pub fn new(
        registry: ResolverRegistry,
        client: HttpClient,
        cache: DiskCache,
        default_icon: DefaultIcon,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            client,
            cache,
            default_icon,
            ttl,
        }
    }

    /// Builds the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] for invalid settings or an unreadable
    /// default icon, and [`ServiceError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let default_icon = config.load_default_icon()?;
        let client = HttpClient::new(config.fetch_options())?;
        Ok(Self::new(
            build_default_resolver_registry(config),
            client,
            DiskCache::new(&config.cache_dir, &config.hash_key),
            default_icon,
            config.cache_ttl(),
        ))
    }

    /// The configured default icon.
    #[must_use]
    pub fn default_icon(&self) -> &DefaultIcon {
        &self.default_icon
    }

    /// Returns the favicon for `raw_url`.
    ///
    /// With `refresh` set the cache read is skipped but the result is still
    /// written. Resolution failures never surface: the default icon is served
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] for unusable input and
    /// [`ServiceError::Cache`] when the result cannot be stored.
    #[tracing::instrument(skip(self), fields(url = %raw_url))]
    pub async fn get_favicon(
        &self,
        raw_url: &str,
        refresh: bool,
    ) -> Result<ServedIcon, ServiceError> {
        let started = Instant::now();
        let target = normalize_url(raw_url)?;
        let origin = target.origin.clone();

        if let Some(ttl) = self.ttl
            && !refresh
            && let Some(bytes) = self.cache.get(&origin, &self.default_icon.digest, ttl).await
        {
            let is_default = bytes == self.default_icon.bytes;
            debug!(
                origin = %origin,
                elapsed_ms = started.elapsed().as_millis(),
                "served from cache"
            );
            return Ok(ServedIcon {
                bytes,
                source: None,
                from_cache: true,
                is_default,
            });
        }

        let ctx = ResolveContext::new(target, self.client.clone());
        let served = match self.registry.resolve(&ctx).await {
            Ok(icon) => ServedIcon {
                bytes: icon.bytes,
                source: Some(icon.source),
                from_cache: false,
                is_default: false,
            },
            Err(error) => {
                debug!(origin = %origin, error = %error, "serving default icon");
                ServedIcon {
                    bytes: self.default_icon.bytes.clone(),
                    source: None,
                    from_cache: false,
                    is_default: true,
                }
            }
        };

        if self.ttl.is_some()
            && let Err(error) = self.cache.set(&origin, &served.bytes).await
        {
            warn!(origin = %origin, error = %error, "cache write failed");
            return Err(error.into());
        }

        debug!(
            origin = %origin,
            source = served.source.as_deref().unwrap_or("default"),
            bytes = served.bytes.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "resolved favicon"
        );
        Ok(served)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::FileMapRule;
    use crate::fetch::FetchOptions;
    use crate::resolver::FileMapResolver;
    use tempfile::TempDir;

    fn service_with_file_map(
        dir: &TempDir,
        icon: Option<PathBuf>,
        ttl: Option<Duration>,
    ) -> FaviconService {
        let mut registry = ResolverRegistry::new();
        if let Some(path) = icon {
            registry.register(Box::new(
                FileMapResolver::from_rules(&[FileMapRule {
                    pattern: r"mapped\.test".to_string(),
                    path,
                }])
                .unwrap(),
            ));
        }
        FaviconService::new(
            registry,
            HttpClient::new(FetchOptions::default()).unwrap(),
            DiskCache::new(dir.path().join("cache"), "test-key"),
            DefaultIcon::new(b"DEFAULT".to_vec()),
            ttl,
        )
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let service = service_with_file_map(&dir, None, Some(Duration::from_secs(60)));
        let err = service.get_favicon("://bad", false).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_total_failure_serves_default_and_caches_it() {
        let dir = TempDir::new().unwrap();
        let service = service_with_file_map(&dir, None, Some(Duration::from_secs(3600)));

        let first = service.get_favicon("example.com", false).await.unwrap();
        assert_eq!(first.bytes, b"DEFAULT");
        assert!(first.is_default);
        assert!(!first.from_cache);

        let second = service.get_favicon("example.com", false).await.unwrap();
        assert_eq!(second.bytes, b"DEFAULT");
        assert!(second.from_cache);
        assert!(second.is_default);
    }

    #[tokio::test]
    async fn test_resolved_icon_records_source() {
        let dir = TempDir::new().unwrap();
        let icon_path = dir.path().join("mapped.ico");
        std::fs::write(&icon_path, b"MAPPED").unwrap();
        let service = service_with_file_map(&dir, Some(icon_path), Some(Duration::from_secs(60)));

        let served = service.get_favicon("http://mapped.test/", false).await.unwrap();
        assert_eq!(served.bytes, b"MAPPED");
        assert_eq!(served.source.as_deref(), Some("file_map"));
        assert!(!served.is_default);
    }

    #[tokio::test]
    async fn test_refresh_skips_cache_read_but_rewrites_entry() {
        let dir = TempDir::new().unwrap();
        let icon_path = dir.path().join("mapped.ico");
        std::fs::write(&icon_path, b"OLD").unwrap();
        let service =
            service_with_file_map(&dir, Some(icon_path.clone()), Some(Duration::from_secs(3600)));

        service.get_favicon("mapped.test", false).await.unwrap();
        std::fs::write(&icon_path, b"NEW").unwrap();

        let cached = service.get_favicon("mapped.test", false).await.unwrap();
        assert_eq!(cached.bytes, b"OLD");
        assert!(cached.from_cache);

        let refreshed = service.get_favicon("mapped.test", true).await.unwrap();
        assert_eq!(refreshed.bytes, b"NEW");
        assert!(!refreshed.from_cache);

        let after = service.get_favicon("mapped.test", false).await.unwrap();
        assert_eq!(after.bytes, b"NEW");
        assert!(after.from_cache);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache_entirely() {
        let dir = TempDir::new().unwrap();
        let service = service_with_file_map(&dir, None, None);

        let served = service.get_favicon("example.com", false).await.unwrap();
        assert!(served.is_default);
        let again = service.get_favicon("example.com", false).await.unwrap();
        assert!(!again.from_cache);
        assert!(!dir.path().join("cache").exists());
    }

    #[tokio::test]
    async fn test_unwritable_cache_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("cache");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let service = service_with_file_map(&dir, None, Some(Duration::from_secs(60)));

        let err = service.get_favicon("example.com", false).await.unwrap_err();
        assert!(matches!(err, ServiceError::Cache(_)));
    }

    #[test]
    fn test_from_config_requires_default_icon() {
        let err = FaviconService::from_config(&AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Config(ConfigError::Missing { .. })
        ));
    }
}
