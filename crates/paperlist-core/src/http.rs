//! Shared HTTP client and runtime.
//!
//! Uses async reqwest internally but presents a sync interface, so callers
//! can fan requests out on rayon workers and block on each one.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

use crate::error::FetchError;

/// HTTP settings applied once at startup (config file, CLI overrides)
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install the HTTP settings. Only the first call has an effect.
pub fn set_http_config(config: HttpConfig) {
    if HTTP_CONFIG.set(config).is_err() {
        log::debug!("HTTP config already set, ignoring");
    }
}

/// Current HTTP settings (defaults if never set).
pub fn http_config() -> &'static HttpConfig {
    HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .pool_max_idle_per_host(10)
        .user_agent(concat!("paperlist/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Blocking GET returning the response body as text.
///
/// Non-2xx statuses are turned into [`FetchError::Http`] with the status set.
pub fn get_text(url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = SHARED_CLIENT
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(FetchError::from_reqwest)?;
        response.text().await.map_err(FetchError::from_reqwest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_config() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn http_config_falls_back_to_default() {
        // Never set in this test binary
        assert!(http_config().max_retries >= 1);
    }
}
