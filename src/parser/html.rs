//! Narrow HTML scraping: finds the first icon `<link>` tag and its `href`.
//!
//! This is deliberately not an HTML parser. It recognizes exactly one pattern,
//! a `<link>` tag whose `rel` is `icon`, `shortcut icon` or `apple-touch-icon`.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)<link\b[^>]*>"));

static ICON_REL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?i)\brel\s*=\s*(?:"\s*(?:shortcut\s+icon|icon|apple-touch-icon)\s*"|'\s*(?:shortcut\s+icon|icon|apple-touch-icon)\s*'|(?:icon|apple-touch-icon)(?:[\s/>]|$))"#,
    )
});

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});

/// Returns the raw `href` of the first icon `<link>` in `html` whose `href` is non-empty.
///
/// Newlines are stripped first so tags split across lines still match.
/// `&amp;` in the value is decoded; the result is otherwise untouched and may
/// be relative.
#[must_use]
pub fn extract_icon_href(html: &str) -> Option<String> {
    let flattened: String = html.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();

    LINK_TAG_RE
        .find_iter(&flattened)
        .map(|tag| tag.as_str())
        .filter(|tag| ICON_REL_RE.is_match(tag))
        .find_map(|tag| {
            HREF_RE.captures(tag).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().trim().replace("&amp;", "&"))
                    .filter(|href| !href.is_empty())
            })
        })
}
