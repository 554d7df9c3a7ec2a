//! HTTP client wrapper for bounded page and icon fetches.
//!
//! This module provides the `HttpClient` struct which follows redirects hop by
//! hop, caps the body it reads, and gates icon responses on image validity.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, LOCATION, RANGE};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tracing::{debug, instrument, trace};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, MAX_BODY_BYTES, MAX_REDIRECTS, REQUEST_TIMEOUT_SECS};
use super::error::FetchError;
use super::validate::{is_image_content_type, validate_image_bytes};
use crate::parser::resolve_link;
use crate::user_agent;

/// Limits applied to every fetch made by one [`HttpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Deadline for one whole fetch: every redirect probe, the GET and the body read.
    pub request_timeout: Duration,
    /// Maximum redirect hops before failing with `TooManyRedirects`.
    pub max_redirects: usize,
    /// Bytes requested through `Range` and the hard cap on bytes read.
    pub max_body_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_redirects: MAX_REDIRECTS,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Whether a fetch was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Transport succeeded, status in 200..=399, and (for images) the body validated.
    Ok,
    /// Anything else; see [`FetchResult::error`].
    Fail,
}

/// Outcome of one fetch, successful or not.
///
/// `effective_url` is always populated: on failure it is the last URL the
/// redirect loop reached, which lets callers notice cross-origin redirects
/// even when the page itself was unusable.
#[derive(Debug)]
pub struct FetchResult {
    /// Accepted or not.
    pub status: FetchStatus,
    /// Response body, truncated to the configured cap. Empty on transport failure.
    pub body: Vec<u8>,
    /// Final URL after the redirect chain.
    pub effective_url: String,
    /// Final HTTP status code, when a response arrived.
    pub http_code: Option<u16>,
    /// Response `Content-Type`, when present.
    pub content_type: Option<String>,
    /// Why the fetch failed, when `status` is `Fail`.
    pub error: Option<FetchError>,
}

impl FetchResult {
    /// Returns true when the fetch was accepted.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }

    fn failed(effective_url: impl Into<String>, error: FetchError) -> Self {
        Self {
            status: FetchStatus::Fail,
            body: Vec::new(),
            effective_url: effective_url.into(),
            http_code: None,
            content_type: None,
            error: Some(error),
        }
    }
}

/// HTTP client for favicon lookups.
///
/// Redirects are never followed natively: each hop is probed with `HEAD` so
/// the hop limit is enforced exactly. Certificate and host-name verification
/// is disabled so sites with broken TLS still yield their icon.
///
/// # Example
///
/// ```no_run
/// use favicon_core::fetch::{FetchOptions, HttpClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(FetchOptions::default())?;
/// let result = client.fetch("https://example.com/favicon.ico", true).await;
/// println!("ok={} bytes={}", result.is_ok(), result.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    options: FetchOptions,
}

impl HttpClient {
    /// Creates a client with the given limits.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend cannot be initialized.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = build_client(&options).map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self { client, options })
    }

    /// Fetches `url`, following redirects hop by hop.
    ///
    /// With `is_image` set, the result is downgraded to `Fail` unless the
    /// content type's primary segment is `image` and the body decodes.
    ///
    /// The whole fetch, redirect probes included, shares one
    /// `request_timeout` deadline; expiry yields [`FetchError::Timeout`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str, is_image: bool) -> FetchResult {
        let deadline = self.options.request_timeout;
        match tokio::time::timeout(deadline, self.fetch_unbounded(url, is_image)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(timeout_ms = deadline.as_millis(), "fetch deadline exceeded");
                FetchResult::failed(url, FetchError::timeout(url))
            }
        }
    }

    async fn fetch_unbounded(&self, url: &str, is_image: bool) -> FetchResult {
        let mut current = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return FetchResult::failed(url, FetchError::invalid_url(url)),
        };

        if let Err(error) = self.follow_redirects(&mut current).await {
            debug!(error = %error, "redirect resolution failed");
            return FetchResult::failed(current.as_str(), error);
        }

        let effective_url = current.to_string();
        let response = match self.send_get(current).await {
            Ok(response) => response,
            Err(error) => return FetchResult::failed(effective_url, error),
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = match read_capped_body(response, &effective_url, self.options.max_body_bytes).await
        {
            Ok(body) => body,
            Err(error) => {
                let mut result = FetchResult::failed(effective_url, error);
                result.http_code = Some(status);
                result.content_type = content_type;
                return result;
            }
        };

        let error = if (200..=399).contains(&status) {
            if is_image {
                check_image(&effective_url, &body, content_type.as_deref()).err()
            } else {
                None
            }
        } else {
            Some(FetchError::http_status(effective_url.as_str(), status))
        };

        debug!(
            status,
            bytes = body.len(),
            effective_url = %effective_url,
            accepted = error.is_none(),
            "fetch complete"
        );

        FetchResult {
            status: if error.is_none() {
                FetchStatus::Ok
            } else {
                FetchStatus::Fail
            },
            body,
            effective_url,
            http_code: Some(status),
            content_type,
            error,
        }
    }

    /// Probes `current` with `HEAD` until a non-redirect status, updating it in place.
    async fn follow_redirects(&self, current: &mut Url) -> Result<(), FetchError> {
        let start = current.to_string();
        let mut remaining = self.options.max_redirects;

        loop {
            let response = self
                .client
                .head(current.clone())
                .send()
                .await
                .map_err(|e| FetchError::from_transport(current.as_str(), e))?;

            let status = response.status().as_u16();
            if !is_redirect_status(status) {
                trace!(status, url = %current, "redirect loop settled");
                return Ok(());
            }

            let next = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| resolve_link(location, current))
                .and_then(|absolute| Url::parse(&absolute).ok())
                .ok_or_else(|| FetchError::bad_redirect(current.as_str(), status))?;

            if remaining == 0 {
                return Err(FetchError::too_many_redirects(
                    start,
                    self.options.max_redirects,
                ));
            }
            remaining -= 1;

            debug!(status, from = %current, to = %next, remaining, "following redirect");
            *current = next;
        }
    }

    async fn send_get(&self, url: Url) -> Result<Response, FetchError> {
        let range = format!("bytes=0-{}", self.options.max_body_bytes.saturating_sub(1));
        let url_text = url.to_string();
        self.client
            .get(url)
            .header(RANGE, range)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url_text, e))
    }
}

fn build_client(options: &FetchOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout)
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .user_agent(user_agent::default_fetch_user_agent())
        .build()
}

fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Streams the body, stopping once `cap` bytes have been collected.
async fn read_capped_body(
    response: Response,
    url: &str,
    cap: usize,
) -> Result<Vec<u8>, FetchError> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_transport(url, e))?;
        let room = cap.saturating_sub(body.len());
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            trace!(cap, "body cap reached; truncating");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

fn check_image(url: &str, body: &[u8], content_type: Option<&str>) -> Result<(), FetchError> {
    if !is_image_content_type(content_type) {
        return Err(FetchError::not_an_image(
            url,
            format!("content-type {}", content_type.unwrap_or("<missing>")),
        ));
    }
    validate_image_bytes(body, content_type)
        .map(|_| ())
        .map_err(|reason| FetchError::not_an_image(url, reason))
}
