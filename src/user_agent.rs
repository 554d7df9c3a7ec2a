//! Shared User-Agent string for outbound favicon fetches.
//!
//! Page scrapes, icon downloads and fallback API calls all send the same
//! header so traffic from this service is identifiable and consistent.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/favicon";

/// Default User-Agent for every outbound fetch.
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("Mozilla/5.0 (compatible; favicon/{version}; +{PROJECT_UA_URL})")
}
