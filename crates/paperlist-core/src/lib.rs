//! Paperlist Core - Shared model and infrastructure
//!
//! This crate holds the `Paper`/`Author` model shared by the parser, the
//! classifier and the table writer, together with the plumbing used by the
//! PubMed client: HTTP client and runtime, retry with backoff, request
//! throttling, logging and progress reporting.

pub mod email;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod progress;
pub mod retry;
pub mod semaphore;
pub mod throttle;

// Re-exports for convenience
pub use email::find_email;
pub use error::FetchError;
pub use http::{HttpConfig, SHARED_RUNTIME, get_text, http_client, http_config, set_http_config};
pub use logging::{IndicatifLogger, init_logging};
pub use model::{Author, Paper};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::retry_with_backoff;
pub use semaphore::Semaphore;
pub use throttle::Throttle;
