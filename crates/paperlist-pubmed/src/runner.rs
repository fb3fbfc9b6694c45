//! Search, fetch and parse a whole query

use std::time::Instant;

use anyhow::{Context, Result};
use paperlist_core::{Paper, ProgressContext, Semaphore, Throttle, fmt_num};
use rayon::prelude::*;

use crate::client::RecordSource;
use crate::medline::parse_record;

/// Records collected for one query
#[derive(Debug, Default)]
pub struct Collection {
    /// IDs returned by the search, in search order
    pub ids: Vec<String>,
    /// Successfully parsed records, in search order
    pub papers: Vec<Paper>,
    pub fetch_failures: usize,
    pub parse_failures: usize,
}

impl Collection {
    /// IDs were found but not a single record made it through.
    pub fn is_total_failure(&self) -> bool {
        !self.ids.is_empty() && self.papers.is_empty()
    }
}

enum Outcome {
    Parsed(Paper),
    FetchFailed,
    ParseFailed,
}

/// Run the query, then fetch and parse every returned ID.
///
/// A failed search is an error. Per-record fetch and parse failures are
/// logged and counted. Requests are capped both in flight
/// ([`RecordSource::concurrency`]) and per second
/// ([`RecordSource::requests_per_second`]).
pub fn collect<S>(source: &S, query: &str, progress: &ProgressContext) -> Result<Collection>
where
    S: RecordSource + Sync,
{
    let start = Instant::now();
    let throttle = source.requests_per_second().map(Throttle::per_second);
    if let Some(throttle) = &throttle {
        log::debug!(
            "Limiting to {} requests/s, {} in flight",
            throttle.rate(),
            source.concurrency()
        );
    }
    let wait_turn = || {
        if let Some(throttle) = &throttle {
            throttle.wait();
        }
    };

    let spinner = progress.stage_line("search");
    spinner.set_message(query.to_string());
    wait_turn();
    let ids = source
        .search(query)
        .with_context(|| format!("PubMed search failed for {query:?}"))?;
    spinner.finish_and_clear();
    log::info!("Search returned {} IDs", fmt_num(ids.len()));

    let permits = Semaphore::new(source.concurrency());
    let pb = progress.count_bar("fetch", ids.len() as u64);

    let outcomes: Vec<Outcome> = ids
        .par_iter()
        .map(|id| {
            let fetched = {
                let _permit = permits.acquire();
                wait_turn();
                source.fetch_record(id)
            };
            pb.inc(1);

            let text = match fetched {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("PMID {id}: fetch failed: {e}");
                    return Outcome::FetchFailed;
                }
            };
            match parse_record(&text) {
                Ok(paper) => {
                    if paper.pubmed_id != *id {
                        log::debug!("PMID {id}: record carries PMID {}", paper.pubmed_id);
                    }
                    Outcome::Parsed(paper)
                }
                Err(e) => {
                    log::warn!("PMID {id}: {e}");
                    Outcome::ParseFailed
                }
            }
        })
        .collect();
    pb.finish_and_clear();

    let mut collection = Collection {
        ids,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Parsed(paper) => collection.papers.push(paper),
            Outcome::FetchFailed => collection.fetch_failures += 1,
            Outcome::ParseFailed => collection.parse_failures += 1,
        }
    }

    log::info!(
        "Parsed {}/{} records ({} fetch failures, {} parse failures) in {:.1}s",
        fmt_num(collection.papers.len()),
        fmt_num(collection.ids.len()),
        collection.fetch_failures,
        collection.parse_failures,
        start.elapsed().as_secs_f64()
    );

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use paperlist_core::FetchError;

    use super::*;

    /// In-memory source: IDs map to record text, missing IDs fail with 404.
    struct FakeSource {
        ids: Vec<String>,
        records: HashMap<String, String>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        limit: usize,
        rate: Option<u32>,
        requested_at: Mutex<Vec<Instant>>,
    }

    impl FakeSource {
        fn new(entries: &[(&str, Option<&str>)], limit: usize) -> Self {
            Self {
                ids: entries.iter().map(|(id, _)| id.to_string()).collect(),
                records: entries
                    .iter()
                    .filter_map(|(id, text)| text.map(|t| (id.to_string(), t.to_string())))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                limit,
                rate: None,
                requested_at: Mutex::new(Vec::new()),
            }
        }

        fn with_rate(mut self, rate: u32) -> Self {
            self.rate = Some(rate);
            self
        }
    }

    impl RecordSource for FakeSource {
        fn search(&self, query: &str) -> Result<Vec<String>, FetchError> {
            if query.is_empty() {
                return Err(FetchError::Api("Empty term".to_string()));
            }
            Ok(self.ids.clone())
        }

        fn fetch_record(&self, id: &str) -> Result<String, FetchError> {
            self.requested_at.lock().unwrap().push(Instant::now());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.records.get(id).cloned().ok_or_else(|| FetchError::Http {
                status: Some(404),
                message: "Not Found".to_string(),
            })
        }

        fn concurrency(&self) -> usize {
            self.limit
        }

        fn requests_per_second(&self) -> Option<u32> {
            self.rate
        }
    }

    fn numbered_entries(n: usize) -> Vec<(String, String)> {
        (0..n).map(|i| (i.to_string(), format!("PMID- {i}\n"))).collect()
    }

    fn entry_refs(entries: &[(String, String)]) -> Vec<(&str, Option<&str>)> {
        entries
            .iter()
            .map(|(id, text)| (id.as_str(), Some(text.as_str())))
            .collect()
    }

    #[test]
    fn collects_in_search_order() {
        let source = FakeSource::new(
            &[
                ("3", Some("PMID- 3\nTI  - Third\n")),
                ("1", Some("PMID- 1\nTI  - First\n")),
                ("2", Some("PMID- 2\nTI  - Second\n")),
            ],
            3,
        );
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        let ids: Vec<&str> = collection.papers.iter().map(|p| p.pubmed_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(collection.fetch_failures, 0);
        assert_eq!(collection.parse_failures, 0);
        assert!(!collection.is_total_failure());
    }

    #[test]
    fn failures_are_counted_not_fatal() {
        let source = FakeSource::new(
            &[
                ("1", Some("PMID- 1\nTI  - Ok\n")),
                ("2", None),
                ("3", Some("TI  - No identifier\n")),
            ],
            2,
        );
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert_eq!(collection.ids.len(), 3);
        assert_eq!(collection.papers.len(), 1);
        assert_eq!(collection.fetch_failures, 1);
        assert_eq!(collection.parse_failures, 1);
    }

    #[test]
    fn search_failure_is_fatal() {
        let source = FakeSource::new(&[], 1);
        let err = collect(&source, "", &ProgressContext::hidden()).unwrap_err();
        assert!(err.to_string().contains("PubMed search failed"));
    }

    #[test]
    fn empty_search_is_not_total_failure() {
        let source = FakeSource::new(&[], 1);
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert!(collection.ids.is_empty());
        assert!(!collection.is_total_failure());
    }

    #[test]
    fn all_fetches_failing_is_total_failure() {
        let source = FakeSource::new(&[("1", None), ("2", None)], 2);
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert!(collection.is_total_failure());
        assert_eq!(collection.fetch_failures, 2);
    }

    #[test]
    fn fetches_respect_concurrency_limit() {
        let entries = numbered_entries(24);
        let source = FakeSource::new(&entry_refs(&entries), 2);
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert_eq!(collection.papers.len(), 24);
        assert!(source.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn fetches_respect_request_rate() {
        let entries = numbered_entries(12);
        let source = FakeSource::new(&entry_refs(&entries), 4).with_rate(20);
        let collection = collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert_eq!(collection.papers.len(), 12);

        let mut times = source.requested_at.lock().unwrap().clone();
        times.sort();
        let span = times[times.len() - 1] - times[0];
        // 12 fetches at 20/s: at least 11 intervals of 50ms, minus scheduling slack
        assert!(span >= Duration::from_millis(500), "12 fetches in {span:?}");
        let rate = (times.len() - 1) as f64 / span.as_secs_f64();
        assert!(rate <= 22.0, "observed {rate:.1} requests/s");
    }

    #[test]
    fn unthrottled_source_is_not_delayed() {
        let entries = numbered_entries(12);
        let source = FakeSource::new(&entry_refs(&entries), 12);
        let start = Instant::now();
        collect(&source, "q", &ProgressContext::hidden()).unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
