use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{Connector, Hit, Provider, ProviderError, ProviderOutcome, fetch_json};
use crate::config::{ApiKey, ProviderConfig};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Work {
    title: Option<String>,
    download_url: Option<String>,
    #[serde(default)]
    links: Vec<WorkLink>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WorkLink {
    #[serde(rename = "type")]
    kind: Option<String>,
    url: Option<String>,
}

impl Work {
    /// Prefers the landing page (`display` link), then the full text, then any link.
    fn link(&self) -> Option<&str> {
        let usable = |l: &&WorkLink| l.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        self.links
            .iter()
            .filter(usable)
            .find(|l| l.kind.as_deref() == Some("display"))
            .and_then(|l| l.url.as_deref())
            .or(self.download_url.as_deref().filter(|u| !u.trim().is_empty()))
            .or_else(|| {
                self.links
                    .iter()
                    .find(usable)
                    .and_then(|l| l.url.as_deref())
            })
    }

    fn into_hit(self) -> Hit {
        Hit::new(Provider::Core, self.title.as_deref(), self.link(), self.score)
    }
}

/// Scientific-article index connector for the CORE v3 works search.
#[derive(Clone)]
pub struct CoreConnector {
    http: Client,
    base_url: Url,
    api_key: ApiKey,
    limit: u16,
    timeout: Duration,
}

impl CoreConnector {
    pub fn new(http: Client, config: &ProviderConfig, timeout: Duration) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            limit: config.rows,
            timeout,
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Hit>, ProviderError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &self.limit.to_string());

        let request = self
            .http
            .get(url)
            .bearer_auth(self.api_key.expose())
            .timeout(self.timeout);
        let body: Option<SearchResponse> = fetch_json(Provider::Core, request).await?;

        Ok(body
            .map(|b| b.results.into_iter().map(Work::into_hit).collect())
            .unwrap_or_default())
    }
}

impl Connector for CoreConnector {
    fn provider(&self) -> Provider {
        Provider::Core
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, ProviderOutcome> {
        async move { ProviderOutcome::from(self.fetch(query).await) }.boxed()
    }
}
