//! Bounded HTTP fetching for pages and icons.
//!
//! This module provides the [`HttpClient`] used by every network strategy in
//! the favicon fallback chain.
//!
//! # Features
//!
//! - Hop-by-hop redirect following with an exact limit (5 by default)
//! - `Range: bytes=0-511999` plus a streamed body cap
//! - Short timeouts (2s connect, 5s total by default)
//! - Image gate: `image/*` content type AND a decodable body
//! - No connection reuse, no TLS verification
//!
//! # Example
//!
//! ```no_run
//! use favicon_core::fetch::{FetchOptions, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(FetchOptions::default())?;
//! let page = client.fetch("https://example.com/", false).await;
//! println!("landed on {}", page.effective_url);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod validate;

pub use client::{FetchOptions, FetchResult, FetchStatus, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_BODY_BYTES, MAX_REDIRECTS, REQUEST_TIMEOUT_SECS};
pub use error::FetchError;
pub use validate::{is_image_content_type, validate_image_bytes};
