//! Image validation gate for icon fetches.
//!
//! A 200 response is not proof of an icon: many sites answer missing paths with
//! an HTML error page. Both the declared content type and the bytes themselves
//! must look like an image.

use std::io::Cursor;

use image::ImageReader;

/// Returns true when the primary segment of `content_type` is `image`.
#[must_use]
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .and_then(|mime| mime.split('/').next())
        .is_some_and(|primary| primary.trim().eq_ignore_ascii_case("image"))
}

/// Checks that `bytes` decode as an image, returning its dimensions.
///
/// Raster formats are probed through the `image` crate header decoder. SVG
/// has no raster header, so an `image/svg+xml` body is accepted when it
/// contains an `<svg` element.
///
/// # Errors
///
/// Returns a human-readable reason when the body is not a recognizable image.
pub fn validate_image_bytes(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<Option<(u32, u32)>, String> {
    if bytes.is_empty() {
        return Err("empty body".to_string());
    }

    if is_svg_content_type(content_type) {
        return if contains_svg_root(bytes) {
            Ok(None)
        } else {
            Err("svg content type without <svg> element".to_string())
        };
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| format!("could not sniff image format: {e}"))?;
    if reader.format().is_none() {
        return Err("unrecognized image format".to_string());
    }
    reader
        .into_dimensions()
        .map(Some)
        .map_err(|e| format!("image header could not be decoded: {e}"))
}

fn is_svg_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("image/svg+xml"))
}

fn contains_svg_root(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(4096)];
    String::from_utf8_lossy(head).to_ascii_lowercase().contains("<svg")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::tiny_png;

    #[test]
    fn test_is_image_content_type_primary_segment() {
        assert!(is_image_content_type(Some("image/png")));
        assert!(is_image_content_type(Some("IMAGE/x-icon; charset=binary")));
        assert!(is_image_content_type(Some("image/vnd.microsoft.icon")));
        assert!(!is_image_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_image_content_type(Some("application/octet-stream")));
        assert!(!is_image_content_type(None));
    }

    #[test]
    fn test_validate_png_returns_dimensions() {
        let png = tiny_png();
        assert_eq!(
            validate_image_bytes(&png, Some("image/png")).unwrap(),
            Some((1, 1))
        );
    }

    #[test]
    fn test_validate_rejects_html_body() {
        let html = b"<!DOCTYPE html><html><body>Not Found</body></html>";
        assert!(validate_image_bytes(html, Some("image/png")).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_body() {
        assert_eq!(
            validate_image_bytes(b"", Some("image/png")).unwrap_err(),
            "empty body"
        );
    }

    #[test]
    fn test_validate_accepts_svg_markup() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(
            validate_image_bytes(svg, Some("image/svg+xml")).unwrap(),
            None
        );
        assert!(validate_image_bytes(b"<html></html>", Some("image/svg+xml")).is_err());
    }
}
