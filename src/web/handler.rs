//! The favicon request handler and its response headers.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, error};

use crate::service::{FaviconService, ServedIcon, ServiceError};

/// How long clients may cache a served icon (one day).
pub const CLIENT_CACHE_SECS: u64 = 86_400;

/// `Cache-Control` value on every icon response.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=86400";

/// `X-Robots-Tag` value on every icon response.
pub const ROBOTS_TAG_VALUE: &str = "noindex, nofollow";

/// Informational header set to `IO` when the icon came from the disk cache.
pub const X_CACHE_TYPE: HeaderName = HeaderName::from_static("x-cache-type");

const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

/// Query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct FaviconQuery {
    /// Site whose favicon is wanted. Required and non-empty.
    pub url: Option<String>,
    /// `true` bypasses the cache read.
    pub refresh: Option<String>,
}

impl FaviconQuery {
    fn wants_refresh(&self) -> bool {
        self.refresh
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1")
    }
}

/// `GET /?url=...`: icon bytes, 400 for bad input, 500 for internal faults.
///
/// Error responses carry an empty body; details go to the log.
pub async fn favicon_handler(
    State(service): State<Arc<FaviconService>>,
    query: Result<Query<FaviconQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(url) = query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        debug!("request without url parameter");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match service.get_favicon(url, query.wants_refresh()).await {
        Ok(icon) => icon_response(icon),
        Err(ServiceError::InvalidUrl(e)) => {
            debug!(error = %e, "rejected url parameter");
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(e) => {
            error!(error = %e, "favicon request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn icon_response(icon: ServedIcon) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/x-icon"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_VALUE),
    );
    let expires =
        httpdate::fmt_http_date(SystemTime::now() + Duration::from_secs(CLIENT_CACHE_SECS));
    if let Ok(value) = HeaderValue::from_str(&expires) {
        headers.insert(header::EXPIRES, value);
    }
    headers.insert(X_ROBOTS_TAG, HeaderValue::from_static(ROBOTS_TAG_VALUE));
    if icon.from_cache {
        headers.insert(X_CACHE_TYPE, HeaderValue::from_static("IO"));
    }

    (StatusCode::OK, headers, icon.bytes).into_response()
}
