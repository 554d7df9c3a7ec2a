//! Cache file naming: `{host}_{keyed hash}.txt`.

use sha2::{Digest, Sha256};

/// Hex characters of the keyed hash kept in the file name.
pub const HASH_PREFIX_LEN: usize = 16;

/// Derives the cache file name for `host`, salted with `hash_key`.
///
/// The host part is lower-cased and restricted to `[a-z0-9.-]` so IPv6
/// literals and stray characters cannot escape the cache directory.
#[must_use]
pub fn cache_file_name(host: &str, hash_key: &str) -> String {
    let host = host.to_ascii_lowercase();
    format!("{}_{}.txt", sanitize_host(&host), keyed_hash(&host, hash_key))
}

fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn keyed_hash(host: &str, hash_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(hash_key.as_bytes());
    hasher.update(b":");
    hasher.update(host.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(HASH_PREFIX_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_layout() {
        let name = cache_file_name("Example.COM", "secret");
        let (host, rest) = name.split_once('_').unwrap_or_default();
        assert_eq!(host, "example.com");
        assert!(rest.ends_with(".txt"));
        assert_eq!(rest.len(), HASH_PREFIX_LEN + ".txt".len());
        assert!(rest[..HASH_PREFIX_LEN].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_file_name_is_stable_and_case_insensitive() {
        assert_eq!(
            cache_file_name("example.com", "k"),
            cache_file_name("EXAMPLE.com", "k")
        );
    }

    #[test]
    fn test_file_name_depends_on_key() {
        assert_ne!(
            cache_file_name("example.com", "key-one"),
            cache_file_name("example.com", "key-two")
        );
    }

    #[test]
    fn test_ipv6_host_is_sanitized() {
        let name = cache_file_name("[::1]", "k");
        assert!(name.starts_with("___1__"));
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
    }
}
