//! Constants for the fetch module (timeouts, redirect and body limits).

/// Default HTTP connect timeout (2 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 2;

/// Default deadline for one whole fetch (5 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Maximum number of redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// Upper bound on bytes requested (via `Range`) and read from any response body.
pub const MAX_BODY_BYTES: usize = 512_000;
