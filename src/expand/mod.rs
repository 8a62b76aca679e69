//! Per-term synonym expansion against an external lexical service.

mod datamuse;

pub use datamuse::DatamuseClient;

/// Source of related words for a single query term.
/// Implemented by `DatamuseClient` for production; mock implementations used in tests.
///
/// Expansion never fails: implementations absorb their own errors and return
/// an empty list, so a term always survives as at least itself.
#[allow(async_fn_in_trait)]
pub trait SynonymSource {
    async fn expand(&self, term: &str) -> Vec<String>;
}
