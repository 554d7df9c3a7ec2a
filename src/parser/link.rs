//! Resolves possibly-relative links (HTML `href`s, redirect `Location`s) against a base URL.

use url::Url;

use super::url::Origin;

/// Resolves `candidate` against `base`, producing an absolute URL.
///
/// Rules, in order:
/// - already absolute (`scheme://...`): returned unchanged
/// - protocol-relative (`//host/path`): prefixed with the base scheme
/// - root-relative (`/path`): prefixed with the base origin
/// - anything else: joined to the directory of the base path, collapsing
///   `.` and `..` segments; `..` never climbs above the root
///
/// Returns `None` for empty candidates, bases without a host, and
/// non-hierarchical schemes such as `data:` or `javascript:`.
#[must_use]
pub fn resolve_link(candidate: &str, base: &Url) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    if candidate.contains("://") {
        return Some(candidate.to_string());
    }
    if has_opaque_scheme(candidate) {
        return None;
    }

    let origin = Origin::from_url(base)?;

    if candidate.starts_with("//") {
        return Some(format!("{}:{candidate}", origin.scheme()));
    }
    if candidate.starts_with('/') {
        return Some(format!("{origin}{candidate}"));
    }

    let (path_part, suffix) = split_path_suffix(candidate);
    let base_path = base.path();
    if path_part.is_empty() {
        // `?q` replaces only the query; `#f` keeps the base query too.
        let kept_query = match base.query() {
            Some(query) if suffix.starts_with('#') => format!("?{query}"),
            _ => String::new(),
        };
        return Some(format!("{origin}{base_path}{kept_query}{suffix}"));
    }
    let base_dir = &base_path[..base_path.rfind('/').map_or(0, |idx| idx + 1)];

    let mut segments: Vec<&str> = Vec::new();
    for segment in base_dir.split('/').chain(path_part.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            real => segments.push(real),
        }
    }

    let trailing_slash = path_part.ends_with('/')
        || path_part.ends_with("/.")
        || path_part.ends_with("/..")
        || matches!(path_part, "." | "..");
    let mut resolved = format!("{origin}/{}", segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        resolved.push('/');
    }
    resolved.push_str(suffix);
    Some(resolved)
}

/// Splits off a `?query` / `#fragment` suffix so only the path is collapsed.
fn split_path_suffix(candidate: &str) -> (&str, &str) {
    match candidate.find(['?', '#']) {
        Some(idx) => candidate.split_at(idx),
        None => (candidate, ""),
    }
}

/// True for `data:`, `javascript:`, `mailto:` style values that carry no fetchable location.
fn has_opaque_scheme(candidate: &str) -> bool {
    let Some(colon) = candidate.find(':') else {
        return false;
    };
    let scheme = &candidate[..colon];
    let first_delimiter = candidate.find(['/', '?', '#']).unwrap_or(candidate.len());
    colon < first_delimiter
        && !scheme.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_absolute_candidate_unchanged() {
        let b = base("https://example.com/a/b.html");
        assert_eq!(
            resolve_link("http://cdn.example.net/icon.png", &b).as_deref(),
            Some("http://cdn.example.net/icon.png")
        );
    }

    #[test]
    fn test_protocol_relative_uses_base_scheme() {
        let b = base("https://example.com/");
        assert_eq!(
            resolve_link("//cdn.example.net/icon.png", &b).as_deref(),
            Some("https://cdn.example.net/icon.png")
        );
    }

    #[test]
    fn test_root_relative_ignores_base_path() {
        for base_url in [
            "http://example.com",
            "http://example.com/",
            "http://example.com/deep/nested/page.html",
            "http://example.com/dir/?q=1",
        ] {
            assert_eq!(
                resolve_link("/static/favicon.ico", &base(base_url)).as_deref(),
                Some("http://example.com/static/favicon.ico"),
                "base: {base_url}"
            );
        }
    }

    #[test]
    fn test_root_relative_keeps_port() {
        let b = base("http://localhost:8080/x/y");
        assert_eq!(
            resolve_link("/favicon.png", &b).as_deref(),
            Some("http://localhost:8080/favicon.png")
        );
    }

    #[test]
    fn test_relative_joins_base_directory() {
        let b = base("https://example.com/blog/post.html");
        assert_eq!(
            resolve_link("img/icon.png", &b).as_deref(),
            Some("https://example.com/blog/img/icon.png")
        );
    }

    #[test]
    fn test_relative_parent_segments_collapse() {
        let b = base("https://example.com/a/b/c/page.html");
        assert_eq!(
            resolve_link("../../icon.png", &b).as_deref(),
            Some("https://example.com/a/icon.png")
        );
        assert_eq!(
            resolve_link("./x/../icon.png", &b).as_deref(),
            Some("https://example.com/a/b/c/icon.png")
        );
    }

    #[test]
    fn test_relative_traversal_clamps_at_root() {
        let b = base("https://example.com/a/page.html");
        assert_eq!(
            resolve_link("../../../../icon.png", &b).as_deref(),
            Some("https://example.com/icon.png")
        );
    }

    #[test]
    fn test_relative_keeps_query_string() {
        let b = base("https://example.com/");
        assert_eq!(
            resolve_link("favicon.ico?v=2", &b).as_deref(),
            Some("https://example.com/favicon.ico?v=2")
        );
    }

    #[test]
    fn test_opaque_and_empty_candidates_yield_none() {
        let b = base("https://example.com/");
        assert_eq!(resolve_link("", &b), None);
        assert_eq!(resolve_link("   ", &b), None);
        assert_eq!(resolve_link("data:image/png;base64,AAAA", &b), None);
        assert_eq!(resolve_link("javascript:void(0)", &b), None);
    }

    #[test]
    fn test_colon_inside_path_is_not_a_scheme() {
        let b = base("https://example.com/dir/");
        assert_eq!(
            resolve_link("icons/a:b.png", &b).as_deref(),
            Some("https://example.com/dir/icons/a:b.png")
        );
    }

    #[test]
    fn test_relative_directory_keeps_trailing_slash() {
        let b = base("https://example.com/a/b");
        assert_eq!(
            resolve_link("icons/", &b).as_deref(),
            Some("https://example.com/a/icons/")
        );
    }

    #[test]
    fn test_query_or_fragment_only_keeps_base_document() {
        let b = base("https://example.com/a/b?old=1");
        assert_eq!(
            resolve_link("?v=2", &b).as_deref(),
            Some("https://example.com/a/b?v=2")
        );
        assert_eq!(
            resolve_link("#icon", &b).as_deref(),
            Some("https://example.com/a/b?old=1#icon")
        );
    }
}
