//! Small in-memory images for tests.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// Encodes a 1x1 PNG of the given colour.
pub(crate) fn png_with_color(rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(1, 1, Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    #[allow(clippy::unwrap_used)]
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A valid 1x1 transparent PNG.
pub(crate) fn tiny_png() -> Vec<u8> {
    png_with_color([0, 0, 0, 0])
}
