use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::SynonymSource;
use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    #[error("lexical service returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct WordEntry {
    word: String,
}

#[derive(Clone)]
pub struct DatamuseClient {
    http: Client,
    endpoint: Url,
    max: u8,
    timeout: Duration,
}

impl DatamuseClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: config.datamuse_url.clone(),
            max: config.max_synonyms,
            timeout: config.timeout,
        }
    }

    async fn fetch(&self, term: &str) -> Result<Vec<String>, ExpansionError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("rel_syn", term)
            .append_pair("max", &self.max.to_string());

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExpansionError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let entries: Vec<WordEntry> = serde_json::from_str(&text)?;

        Ok(entries
            .into_iter()
            .map(|e| e.word.trim().to_string())
            .filter(|w| !w.is_empty() && w != term)
            .take(self.max as usize)
            .collect())
    }
}

impl SynonymSource for DatamuseClient {
    async fn expand(&self, term: &str) -> Vec<String> {
        match self.fetch(term).await {
            Ok(words) => {
                debug!(term, count = words.len(), "expansion complete");
                words
            }
            Err(e) => {
                warn!(term, error = %e, "synonym expansion failed (continuing without synonyms)");
                Vec::new()
            }
        }
    }
}
