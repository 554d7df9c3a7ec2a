//! Favicon Core Library
//!
//! This library locates a website's favicon through an ordered chain of
//! heuristics and caches the result on disk keyed by hostname.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - URL normalization, relative link resolution, icon `<link>` scraping
//! - [`fetch`] - Bounded HTTP fetches with hop-by-hop redirects and an image gate
//! - [`resolver`] - The fallback chain of favicon strategies
//! - [`cache`] - Hostname-keyed disk cache with default-icon expiry
//! - [`config`] - TOML settings, default icon, hash-key rotation
//! - [`service`] - Request orchestration (cache, resolve, default, store)
//! - [`web`] - `GET /?url=` HTTP interface

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod fetch;
pub mod parser;
pub mod resolver;
pub mod service;
pub mod web;

mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use cache::{CacheError, DiskCache};
pub use config::{AppConfig, ConfigError, ConfigStore};
pub use fetch::{FetchError, FetchResult, HttpClient};
pub use parser::{Origin, ParseError, normalize};
pub use resolver::{ResolveError, ResolverRegistry, build_default_resolver_registry};
pub use service::{FaviconService, ServedIcon, ServiceError};
