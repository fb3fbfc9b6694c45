//! NCBI E-utilities client
//!
//! `esearch` returns an XML document listing PubMed IDs; `efetch` with
//! `rettype=medline&retmode=text` returns one MEDLINE record per ID.

use paperlist_core::{FetchError, get_text, retry_with_backoff};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::config::ClientConfig;

/// Source of PubMed IDs and raw MEDLINE records.
///
/// [`PubmedClient`] is the network implementation; the runner only depends
/// on this trait.
pub trait RecordSource {
    /// Resolve a query to PubMed IDs, in relevance order.
    fn search(&self, query: &str) -> Result<Vec<String>, FetchError>;

    /// Raw MEDLINE text for one PubMed ID.
    fn fetch_record(&self, id: &str) -> Result<String, FetchError>;

    /// Maximum number of concurrent `fetch_record` calls.
    fn concurrency(&self) -> usize {
        1
    }

    /// Request-rate limit, if the source has one.
    fn requests_per_second(&self) -> Option<u32> {
        None
    }
}

/// Blocking E-utilities client with retry on transient failures
#[derive(Debug, Clone, Default)]
pub struct PubmedClient {
    config: ClientConfig,
}

impl PubmedClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl RecordSource for PubmedClient {
    fn search(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let url = self.config.endpoint("esearch.fcgi");
        let retmax = self.config.max_results.to_string();
        let mut params = vec![("db", "pubmed"), ("term", query), ("retmax", retmax.as_str())];
        params.extend(self.config.identity_params());

        log::debug!("esearch: {query:?} (retmax {retmax})");
        let body = retry_with_backoff("esearch", || get_text(&url, &params))?;
        let result = parse_search_response(&body)?;
        log::debug!(
            "esearch: {} of {} matching IDs returned",
            result.ids.len(),
            result.count
        );
        Ok(result.ids)
    }

    fn fetch_record(&self, id: &str) -> Result<String, FetchError> {
        let url = self.config.endpoint("efetch.fcgi");
        let mut params = vec![
            ("db", "pubmed"),
            ("id", id),
            ("rettype", "medline"),
            ("retmode", "text"),
        ];
        params.extend(self.config.identity_params());

        let label = format!("efetch {id}");
        let body = retry_with_backoff(&label, || get_text(&url, &params))?;
        if body.trim().is_empty() {
            return Err(FetchError::Api(format!("empty record for PMID {id}")));
        }
        Ok(body)
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency()
    }

    fn requests_per_second(&self) -> Option<u32> {
        Some(self.config.requests_per_second())
    }
}

/// Parsed `eSearchResult` document
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Total number of matches (may exceed `ids.len()`)
    pub count: usize,
    pub ids: Vec<String>,
}

/// Parse an `esearch` XML response.
///
/// An `<ERROR>` element becomes [`FetchError::Api`]. Only `<Id>` elements
/// inside `<IdList>` are collected, and only the first `<Count>` is read
/// (the translation stack repeats the tag per term).
pub fn parse_search_response(xml: &str) -> Result<SearchResult, FetchError> {
    let malformed = |e: quick_xml::Error| FetchError::Api(format!("malformed esearch response: {e}"));

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut result = SearchResult::default();
    let mut seen_count = false;
    let mut in_id_list = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(e) => match e.name().as_ref() {
                b"IdList" => in_id_list = true,
                b"Id" if in_id_list => {
                    let id = reader.read_text(e.name()).map_err(malformed)?;
                    let id = id.trim();
                    if !id.is_empty() {
                        result.ids.push(id.to_string());
                    }
                }
                b"Count" if !seen_count => {
                    seen_count = true;
                    let count = reader.read_text(e.name()).map_err(malformed)?;
                    result.count = count.trim().parse().unwrap_or(0);
                }
                b"ERROR" => {
                    let message = reader.read_text(e.name()).map_err(malformed)?;
                    return Err(FetchError::Api(message.trim().to_string()));
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"IdList" => in_id_list = false,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(result)
}
