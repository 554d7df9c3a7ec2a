//! Replaces a known-insecure cache hash key with a random one, once, at startup.

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{info, warn};

use super::{AppConfig, ConfigError, ConfigStore};

/// The placeholder key shipped in sample configs and used by default.
pub const INSECURE_HASH_KEY: &str = "change-this-hash-key";

/// Length of generated keys.
pub const HASH_KEY_LEN: usize = 32;

/// True when `key` is empty or the shipped placeholder.
#[must_use]
pub fn is_insecure_hash_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == INSECURE_HASH_KEY
}

/// Generates a random alphanumeric key.
#[must_use]
pub fn generate_hash_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(HASH_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Swaps an insecure key for a fresh one. Returns true when the key changed.
pub fn rotate_insecure_hash_key(config: &mut AppConfig) -> bool {
    if !is_insecure_hash_key(&config.hash_key) {
        return false;
    }
    config.hash_key = generate_hash_key();
    true
}

/// Rotates an insecure key and persists the result through `store`.
///
/// Settings are validated first, so an incomplete config is never written
/// back. A store without a backing file keeps the rotated key in memory only;
/// cache file names then change on every restart, which is logged.
///
/// # Errors
///
/// Returns the [`AppConfig::validate`] error for invalid settings, or a
/// [`ConfigError`] when the rotated settings cannot be written.
pub fn ensure_secure_hash_key(
    store: &ConfigStore,
    config: &mut AppConfig,
) -> Result<bool, ConfigError> {
    config.validate()?;
    if !rotate_insecure_hash_key(config) {
        return Ok(false);
    }
    match store.path() {
        Some(path) => {
            store.save(config)?;
            info!(path = %path.display(), "rotated insecure hash_key and saved config");
        }
        None => warn!("rotated insecure hash_key in memory only; no config file to persist it"),
    }
    Ok(true)
}
