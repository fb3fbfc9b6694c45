//! Error type for E-utilities requests

/// Failure of a single request against the remote literature service.
///
/// Parse failures of the returned records are not represented here; they are
/// local to one record and handled by the record parser.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP or transport error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// The service answered 200 but reported an error in the body
    Api(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Api(message) => write!(f, "API error: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so API keys in the query string never reach logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    /// Rate limits, server errors and transport failures are worth retrying.
    /// Other 4xx answers and API-level errors will not change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status: None, .. } => true,
            Self::Http {
                status: Some(s), ..
            } => *s == 429 || (500..=599).contains(s),
            Self::Api(_) => false,
        }
    }
}
