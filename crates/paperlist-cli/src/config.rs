//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use paperlist_classify::{AcademicPrecedence, AffiliationClassifier, Category, Lexicon};
use paperlist_core::HttpConfig;
use paperlist_pubmed::ClientConfig;
use paperlist_pubmed::config::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Global configuration for get-papers-list
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pubmed: PubmedConfig,
    pub http: HttpSection,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PubmedConfig {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub email: Option<String>,
    pub tool: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    pub max_results: usize,
}

impl Default for PubmedConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: std::env::var("NCBI_EMAIL").ok(),
            tool: client.tool,
            api_key: std::env::var("NCBI_API_KEY").ok(),
            max_results: client.max_results,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub max_retries: u32,
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub request_timeout: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        let http = HttpConfig::default();
        Self {
            max_retries: http.max_retries,
            connect_timeout: http.connect_timeout.as_secs(),
            request_timeout: http.request_timeout.as_secs(),
        }
    }
}

impl HttpSection {
    pub fn to_http_config(self, max_retries: Option<u32>) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            request_timeout: Duration::from_secs(self.request_timeout),
            max_retries: max_retries.unwrap_or(self.max_retries),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub precedence: AcademicPrecedence,
    /// Extra whole-word academic keywords
    pub academic_keywords: Vec<String>,
    /// Extra whole-word industry keywords
    pub non_academic_keywords: Vec<String>,
}

impl ClassifierConfig {
    /// Built-in lexicon plus configured keywords, with an optional policy
    /// override from the command line.
    pub fn build(&self, precedence: Option<AcademicPrecedence>) -> AffiliationClassifier {
        let mut lexicon = Lexicon::builtin();
        lexicon.extend(Category::Academic, &self.academic_keywords);
        lexicon.extend(Category::NonAcademic, &self.non_academic_keywords);
        AffiliationClassifier::new(lexicon, precedence.unwrap_or(self.precedence))
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct ClientOverrides {
    pub email: Option<String>,
    pub api_key: Option<String>,
    pub max_results: Option<usize>,
}

impl PubmedConfig {
    pub fn to_client_config(&self, overrides: ClientOverrides) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            email: overrides.email.or_else(|| self.email.clone()),
            tool: self.tool.clone(),
            api_key: overrides.api_key.or_else(|| self.api_key.clone()),
            max_results: overrides.max_results.unwrap_or(self.max_results),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./paperlist.toml (current directory)
    /// 2. ~/.config/paperlist/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("paperlist.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "paperlist") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use paperlist_classify::Classification;

    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.pubmed.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.pubmed.max_results, 100);
        assert_eq!(config.pubmed.tool, "paperlist");
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.classifier.precedence, AcademicPrecedence::AnyChunk);
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("PAPERLIST_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${PAPERLIST_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("PAPERLIST_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("me@example.org"), Some("me@example.org".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[pubmed]
base_url = "http://localhost:9000/eutils/"
email = "me@example.org"
api_key = "${NONEXISTENT_VAR_12345}"
max_results = 25

[http]
max_retries = 5
connect_timeout = 10

[classifier]
precedence = "all-chunks"
non_academic_keywords = ["diagnostics"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pubmed.base_url, "http://localhost:9000/eutils/");
        assert_eq!(config.pubmed.email.as_deref(), Some("me@example.org"));
        assert_eq!(config.pubmed.api_key, None);
        assert_eq!(config.pubmed.max_results, 25);
        assert_eq!(config.pubmed.tool, "paperlist");
        assert_eq!(config.http.max_retries, 5);
        assert_eq!(config.http.connect_timeout, 10);
        assert_eq!(config.http.request_timeout, 60);
        assert_eq!(config.classifier.precedence, AcademicPrecedence::AllChunks);
        assert_eq!(config.classifier.non_academic_keywords, vec!["diagnostics"]);
    }

    #[test]
    fn invalid_precedence_rejected() {
        let toml = "[classifier]\nprecedence = \"strict\"\n";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let pubmed = PubmedConfig {
            email: Some("file@example.org".to_string()),
            api_key: None,
            ..Default::default()
        };
        let client = pubmed.to_client_config(ClientOverrides {
            email: Some("cli@example.org".to_string()),
            api_key: Some("key".to_string()),
            max_results: Some(7),
        });
        assert_eq!(client.email.as_deref(), Some("cli@example.org"));
        assert_eq!(client.api_key.as_deref(), Some("key"));
        assert_eq!(client.max_results, 7);
        assert_eq!(client.concurrency(), 10);
    }

    #[test]
    fn http_section_conversion() {
        let http = HttpSection {
            max_retries: 2,
            connect_timeout: 5,
            request_timeout: 15,
        };
        let config = http.to_http_config(None);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert_eq!(http.to_http_config(Some(9)).max_retries, 9);
    }

    #[test]
    fn classifier_config_builds_extended_lexicon() {
        let config = ClassifierConfig {
            precedence: AcademicPrecedence::AnyChunk,
            academic_keywords: vec![],
            non_academic_keywords: vec!["diagnostics".to_string()],
        };
        let classifier = config.build(Some(AcademicPrecedence::AllChunks));
        assert_eq!(classifier.precedence(), AcademicPrecedence::AllChunks);
        assert_eq!(
            classifier.classify("Roche Diagnostics, Basel").classification,
            Classification::NonAcademic
        );
    }

    #[test]
    fn from_file_reports_path() {
        let err = Config::from_file(Path::new("/nonexistent/paperlist.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/paperlist.toml"));
    }
}
