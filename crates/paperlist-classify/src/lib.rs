//! Paperlist Classify - academic vs. industry affiliation heuristics
//!
//! - [`lexicon`]: keyword tables and boundary-aware matching
//! - [`classifier`]: per-affiliation verdict and company-name extraction
//! - [`filter`]: keeps papers with at least one non-academic author

pub mod classifier;
pub mod filter;
pub mod lexicon;

// Re-exports
pub use classifier::{AcademicPrecedence, AffiliationClassifier, Classification, Verdict};
pub use filter::PaperFilter;
pub use lexicon::{Boundary, Category, Keyword, Lexicon};
