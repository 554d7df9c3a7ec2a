//! Parsing helpers for the favicon pipeline.
//!
//! - [`normalize`] / [`normalize_url`] - turn caller input into an [`Origin`]
//! - [`resolve_link`] - absolutize `href` and `Location` values
//! - [`extract_icon_href`] - find the first icon `<link>` in a page
//!
//! # Example
//!
//! ```
//! use favicon_core::parser::{normalize_url, resolve_link, extract_icon_href};
//!
//! let target = normalize_url("example.com/blog/").unwrap();
//! let href = extract_icon_href(r#"<link rel="icon" href="../fav.png">"#).unwrap();
//! let icon = resolve_link(&href, &target.page_url).unwrap();
//! assert_eq!(icon, "http://example.com/fav.png");
//! ```

mod error;
mod html;
mod link;
mod url;

pub use error::{MAX_URL_LENGTH, ParseError};
pub use html::extract_icon_href;
pub use link::resolve_link;
pub use url::{NormalizedUrl, Origin, normalize, normalize_url};
