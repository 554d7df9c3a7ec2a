//! Config file discovery and persistence.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{AppConfig, ConfigError};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FAVICON_CONFIG";

/// Resolves default config path.
///
/// Priority:
/// 1. `$FAVICON_CONFIG`
/// 2. `$XDG_CONFIG_HOME/favicon/config.toml`
/// 3. `$HOME/.config/favicon/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    resolve_config_path_with(|name| env::var_os(name))
}

fn resolve_config_path_with(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(explicit) = non_empty(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(explicit));
    }
    if let Some(xdg_config_home) = non_empty("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("favicon")
                .join("config.toml"),
        );
    }

    let home = non_empty("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("favicon")
            .join("config.toml"),
    )
}

/// Settings store backed by a TOML file.
///
/// A store without a path (no `--config`, no env, no home directory) yields
/// built-in defaults and cannot persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store at `explicit` when given, else the default location.
    #[must_use]
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            path: explicit
                .map(Path::to_path_buf)
                .or_else(resolve_default_config_path),
        }
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads settings; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file exists but cannot be read and
    /// [`ConfigError::Parse`] when it is not valid.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let Some(path) = self.path.as_deref() else {
            debug!("no config path resolved; using defaults");
            return Ok(AppConfig::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "config file not found; using defaults");
            return Ok(AppConfig::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = AppConfig::from_toml_str(&raw, path)?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Writes settings back, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for a path-less store and
    /// [`ConfigError::Io`] / [`ConfigError::Serialize`] on write failure.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let path = self.path.as_deref().ok_or_else(|| {
            ConfigError::missing(
                "config path",
                "Pass --config or set FAVICON_CONFIG so settings can be persisted",
            )
        })?;
        let raw = config.to_toml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        std::fs::write(path, raw).map_err(|e| ConfigError::io(path, e))?;
        debug!(path = %path.display(), "saved config file");
        Ok(())
    }
}
