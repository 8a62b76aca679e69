//! Federated search: each query term is expanded with synonyms, the
//! expanded boolean query is sent to every content provider at once, and the
//! hits are merged into one list ranked by max-normalized relevance.

pub mod config;
pub mod expand;
pub mod markdown;
pub mod pipeline;
pub mod providers;
pub mod query;
pub mod rank;

pub use config::{Config, ConfigError};
pub use pipeline::{Federation, SearchError, SearchRun};
pub use rank::ResultRecord;

pub const USER_AGENT: &str = concat!("trawl/", env!("CARGO_PKG_VERSION"));
