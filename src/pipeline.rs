use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::expand::{DatamuseClient, SynonymSource};
use crate::providers::{Connector, CoreConnector, EuropeanaConnector};
use crate::query::QueryBuilder;
use crate::rank::{ResultRecord, aggregate};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("empty query")]
    EmptyQuery,
}

/// Ranked records together with the boolean query that produced them.
#[derive(Debug)]
pub struct SearchRun {
    pub query: String,
    pub records: Vec<ResultRecord>,
}

/// One search pipeline: query expansion followed by federated retrieval.
///
/// Holds only startup configuration; every call to [`Federation::handle_search`]
/// owns its own working state.
pub struct Federation<S> {
    builder: QueryBuilder<S>,
    connectors: Vec<Box<dyn Connector>>,
}

impl Federation<DatamuseClient> {
    /// Wires Datamuse expansion with the Europeana and CORE connectors, in
    /// that declaration order.
    pub fn from_config(http: Client, config: &Config) -> Self {
        let connectors: Vec<Box<dyn Connector>> = vec![
            Box::new(EuropeanaConnector::new(
                http.clone(),
                &config.europeana,
                config.timeout,
            )),
            Box::new(CoreConnector::new(http.clone(), &config.core, config.timeout)),
        ];
        Self::new(DatamuseClient::new(http, config), connectors)
    }
}

impl<S: SynonymSource> Federation<S> {
    pub fn new(synonyms: S, connectors: Vec<Box<dyn Connector>>) -> Self {
        Self {
            builder: QueryBuilder::new(synonyms),
            connectors,
        }
    }

    /// Builds the boolean query for `raw` without contacting any provider.
    pub async fn build_query(&self, raw: &str) -> String {
        self.builder.build(raw).await
    }

    /// Expands `raw`, searches every provider and returns the ranked records.
    ///
    /// An empty `raw` is rejected; input made only of whitespace has no terms
    /// and yields an empty list without any provider being contacted.
    pub async fn handle_search(&self, raw: &str) -> Result<Vec<ResultRecord>, SearchError> {
        self.run(raw).await.map(|run| run.records)
    }

    /// Same as [`Federation::handle_search`], keeping the built query.
    pub async fn run(&self, raw: &str) -> Result<SearchRun, SearchError> {
        if raw.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let query = self.build_query(raw).await;
        if query.is_empty() {
            info!("query has no terms, nothing to search");
            return Ok(SearchRun {
                query,
                records: Vec::new(),
            });
        }

        info!(%query, providers = self.connectors.len(), "searching");
        let records = aggregate(&query, &self.connectors).await;
        info!(results = records.len(), "search complete");
        Ok(SearchRun { query, records })
    }
}
