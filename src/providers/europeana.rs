use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{Connector, Hit, Provider, ProviderError, ProviderOutcome, fetch_json};
use crate::config::{ApiKey, ProviderConfig};

/// Europeana Search API profile; `minimal` carries title, guid and score.
const PROFILE: &str = "minimal";
/// Header form of the `wskey` credential, kept out of the URL.
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: Option<Vec<String>>,
    guid: Option<String>,
    edm_is_shown_at: Option<Vec<String>>,
    score: Option<f64>,
}

impl Item {
    fn into_hit(self) -> Hit {
        let title = self
            .title
            .as_deref()
            .and_then(|titles| titles.iter().find(|t| !t.trim().is_empty()))
            .map(String::as_str);
        let link = self
            .guid
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .or_else(|| {
                self.edm_is_shown_at
                    .as_deref()
                    .and_then(|links| links.first())
                    .map(String::as_str)
            });
        Hit::new(Provider::Europeana, title, link, self.score)
    }
}

/// Cultural-heritage archive connector for the Europeana Search API.
#[derive(Clone)]
pub struct EuropeanaConnector {
    http: Client,
    base_url: Url,
    api_key: ApiKey,
    rows: u16,
    timeout: Duration,
}

impl EuropeanaConnector {
    pub fn new(http: Client, config: &ProviderConfig, timeout: Duration) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            rows: config.rows,
            timeout,
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Hit>, ProviderError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("rows", &self.rows.to_string())
            .append_pair("profile", PROFILE);

        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .timeout(self.timeout);
        let body: Option<SearchResponse> = fetch_json(Provider::Europeana, request).await?;

        Ok(body
            .map(|b| b.items.into_iter().map(Item::into_hit).collect())
            .unwrap_or_default())
    }
}

impl Connector for EuropeanaConnector {
    fn provider(&self) -> Provider {
        Provider::Europeana
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, ProviderOutcome> {
        async move { ProviderOutcome::from(self.fetch(query).await) }.boxed()
    }
}
