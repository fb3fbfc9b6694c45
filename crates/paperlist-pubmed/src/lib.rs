//! Paperlist PubMed - search, fetch and parse PubMed records
//!
//! Talks to the NCBI E-utilities: `esearch` resolves a query to PubMed IDs,
//! `efetch` returns each record in MEDLINE text format, and the record
//! parser turns that text into [`Paper`](paperlist_core::Paper) values.
//!
//! # Example
//!
//! ```ignore
//! use paperlist_core::ProgressContext;
//! use paperlist_pubmed::{ClientConfig, PubmedClient, collect};
//!
//! let client = PubmedClient::new(ClientConfig {
//!     email: Some("me@example.org".into()),
//!     ..Default::default()
//! });
//! let collection = collect(&client, "cancer immunotherapy", &ProgressContext::hidden())?;
//! println!("Parsed {} records", collection.papers.len());
//! ```

pub mod client;
pub mod config;
pub mod medline;
pub mod runner;

// Re-exports
pub use client::{PubmedClient, RecordSource};
pub use config::ClientConfig;
pub use medline::{ParseError, parse_batch, parse_record, split_records};
pub use runner::{Collection, collect};
