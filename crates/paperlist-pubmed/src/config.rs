//! E-utilities client configuration

/// Default E-utilities endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// NCBI request rate without an API key
const ANONYMOUS_RATE: u32 = 3;
/// NCBI request rate with an API key
const KEYED_RATE: u32 = 10;

/// Connection settings and contact identity for the E-utilities client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Contact email sent with every request (`email=`)
    pub email: Option<String>,
    /// Tool name sent with every request (`tool=`)
    pub tool: String,
    pub api_key: Option<String>,
    /// `retmax` for the ID search
    pub max_results: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: None,
            tool: "paperlist".to_string(),
            api_key: None,
            max_results: 100,
        }
    }
}

impl ClientConfig {
    /// Requests per second NCBI allows for this identity.
    pub fn requests_per_second(&self) -> u32 {
        if self.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            KEYED_RATE
        } else {
            ANONYMOUS_RATE
        }
    }

    /// Maximum number of concurrent record fetches (one per allowed
    /// request per second).
    pub fn concurrency(&self) -> usize {
        self.requests_per_second() as usize
    }

    /// Full URL of an E-utilities endpoint (`esearch.fcgi`, `efetch.fcgi`).
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }

    /// Identity parameters appended to every request.
    pub fn identity_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("tool", self.tool.as_str())];
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            params.push(("email", email));
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("api_key", key));
        }
        params
    }
}
