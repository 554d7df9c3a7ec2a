//! Runtime configuration: TOML settings, the default icon, and hash-key rotation.
//!
//! # Example
//!
//! ```no_run
//! use favicon_core::config::{ConfigStore, ensure_secure_hash_key};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::discover(None);
//! let mut config = store.load()?;
//! ensure_secure_hash_key(&store, &mut config)?;
//! config.validate()?;
//! let icon = config.load_default_icon()?;
//! println!("default icon is {} bytes", icon.bytes.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod rotation;
mod store;

pub use error::ConfigError;
pub use rotation::{
    HASH_KEY_LEN, INSECURE_HASH_KEY, ensure_secure_hash_key, generate_hash_key,
    is_insecure_hash_key, rotate_insecure_hash_key,
};
pub use store::{CONFIG_ENV_VAR, ConfigStore, resolve_default_config_path};

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::{IconDigest, content_digest};
use crate::fetch::{
    CONNECT_TIMEOUT_SECS, FetchOptions, MAX_BODY_BYTES, MAX_REDIRECTS, REQUEST_TIMEOUT_SECS,
};

/// Default cache TTL (30 days).
pub const DEFAULT_EXPIRE_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Default listen port for `favicon serve`.
pub const DEFAULT_PORT: u16 = 8080;

/// One operator rule mapping matching origins to a local icon file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapRule {
    /// Regex matched against the normalized origin (`scheme://host[:port]`).
    pub pattern: String,
    /// Icon file served for matching origins.
    pub path: PathBuf,
}

/// All settings, as read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Verbose logging, optionally to `log_file`.
    pub debug_mode: bool,
    /// Log destination used when `debug_mode` is on.
    pub log_file: Option<PathBuf>,
    /// Directory holding cache entries.
    pub cache_dir: PathBuf,
    /// Secret salting cache file names.
    pub hash_key: String,
    /// Icon served when every strategy fails. Required.
    pub default_icon_path: Option<PathBuf>,
    /// Cache TTL in seconds; 0 disables caching.
    pub expire_seconds: u64,
    /// Address `favicon serve` binds to.
    pub listen_addr: SocketAddr,
    /// Outbound connect timeout.
    pub connect_timeout_secs: u64,
    /// Total deadline for one outbound fetch, redirect probes included.
    pub request_timeout_secs: u64,
    /// Redirect hop limit.
    pub max_redirects: usize,
    /// Range size and body cap for outbound fetches.
    pub max_body_bytes: usize,
    /// External favicon API templates, tried in order (`{url}`, `{host}`).
    pub fallback_apis: Vec<String>,
    /// Operator file map, checked before any network access.
    pub file_map: Vec<FileMapRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            log_file: None,
            cache_dir: PathBuf::from("cache"),
            hash_key: INSECURE_HASH_KEY.to_string(),
            default_icon_path: None,
            expire_seconds: DEFAULT_EXPIRE_SECONDS,
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECTS,
            max_body_bytes: MAX_BODY_BYTES,
            fallback_apis: vec![
                "https://www.google.com/s2/favicons?domain_url={url}".to_string(),
                "https://icons.duckduckgo.com/ip3/{host}.ico".to_string(),
            ],
            file_map: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(raw: &str, origin: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.into(),
            source,
        })
    }

    /// Encodes settings as TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if encoding fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::Serialize { source })
    }

    /// Validates values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `default_icon_path` is unset and
    /// [`ConfigError::Invalid`] for out-of-range values or bad file-map patterns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_icon_path.is_none() {
            return Err(ConfigError::missing(
                "default_icon_path",
                "Set default_icon_path in config.toml to an image served when no favicon is found",
            ));
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        if self.max_redirects > 20 {
            return Err(ConfigError::invalid(
                "max_redirects",
                self.max_redirects,
                "0..=20",
            ));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(ConfigError::invalid(
                "max_body_bytes",
                self.max_body_bytes,
                "1024..=16777216",
            ));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("cache_dir", "\"\"", "a directory path"));
        }
        for template in &self.fallback_apis {
            if !template.starts_with("http://") && !template.starts_with("https://") {
                return Err(ConfigError::invalid(
                    "fallback_apis",
                    template,
                    "an http(s) URL template",
                ));
            }
        }
        for rule in &self.file_map {
            if rule.pattern.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "file_map.pattern",
                    "\"\"",
                    "a non-empty regex",
                ));
            }
            if let Err(e) = Regex::new(&rule.pattern) {
                return Err(ConfigError::invalid(
                    "file_map.pattern",
                    &rule.pattern,
                    &e.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Outbound fetch limits.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_redirects: self.max_redirects,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Cache TTL, or `None` when caching is disabled.
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.expire_seconds > 0).then(|| Duration::from_secs(self.expire_seconds))
    }

    /// Reads the configured default icon.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when unset and
    /// [`ConfigError::DefaultIcon`] when unreadable or empty.
    pub fn load_default_icon(&self) -> Result<DefaultIcon, ConfigError> {
        let path = self.default_icon_path.as_ref().ok_or_else(|| {
            ConfigError::missing("default_icon_path", "Set default_icon_path in config.toml")
        })?;
        let bytes = std::fs::read(path).map_err(|e| ConfigError::DefaultIcon {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        if bytes.is_empty() {
            return Err(ConfigError::DefaultIcon {
                path: path.clone(),
                reason: "file is empty".to_string(),
            });
        }
        Ok(DefaultIcon::new(bytes))
    }
}

fn validate_timeout_secs(field: &str, value: u64) -> Result<(), ConfigError> {
    if !(1..=300).contains(&value) {
        return Err(ConfigError::invalid(field, value, "1..=300"));
    }
    Ok(())
}

/// The fallback icon served when nothing else is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultIcon {
    /// Raw bytes.
    pub bytes: Vec<u8>,
    /// Content digest, compared against cache entries.
    pub digest: IconDigest,
}

impl DefaultIcon {
    /// Wraps `bytes`, computing their digest.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        let digest = content_digest(&bytes);
        Self { bytes, digest }
    }
}
