//! Test images and configuration builders.

use std::io::Cursor;
use std::path::Path;

use favicon_core::AppConfig;
use image::{ImageFormat, Rgba, RgbaImage};

/// A 2x2 PNG filled with `rgba`.
pub fn png_with_color(rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(2, 2, Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

/// Configuration rooted in `dir` with a default icon on disk and no external APIs.
pub fn config_in(dir: &Path, default_icon: &[u8]) -> AppConfig {
    let icon_path = dir.join("default.png");
    std::fs::write(&icon_path, default_icon).expect("write default icon");
    AppConfig {
        cache_dir: dir.join("cache"),
        default_icon_path: Some(icon_path),
        hash_key: "integration-test-key".to_string(),
        fallback_apis: Vec::new(),
        ..AppConfig::default()
    }
}
