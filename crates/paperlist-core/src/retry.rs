//! Retry with exponential backoff for E-utilities requests

use std::time::Duration;

use crate::error::FetchError;
use crate::http::http_config;

/// Longest wait between two attempts
pub const MAX_BACKOFF_SECS: u64 = 60;

/// Exponential backoff: 2^attempt seconds (2s, 4s, 8s, ...), capped at
/// [`MAX_BACKOFF_SECS`].
pub const fn backoff_duration(attempt: u32) -> Duration {
    let secs = match 2u64.checked_pow(attempt) {
        Some(secs) if secs < MAX_BACKOFF_SECS => secs,
        _ => MAX_BACKOFF_SECS,
    };
    Duration::from_secs(secs)
}

/// Retry a fallible request with exponential backoff.
///
/// Retryable errors are logged and retried up to `max_retries` (from the
/// global [`HttpConfig`](crate::http::HttpConfig)). Returns the first
/// success, or the last error once retries are exhausted or the error is not
/// retryable.
pub fn retry_with_backoff<T>(
    label: &str,
    attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    retry_with(label, http_config().max_retries, backoff_duration, attempt_fn)
}

fn retry_with<T>(
    label: &str,
    max_retries: u32,
    delay: impl Fn(u32) -> Duration,
    mut attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                attempt += 1;
                log::debug!("{label}: attempt {attempt}/{max_retries} failed: {e}, retrying...");
                std::thread::sleep(delay(attempt));
            }
            Err(e) => {
                log::debug!("{label}: giving up: {e}");
                return Err(e);
            }
        }
    }
}
