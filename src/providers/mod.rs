//! Content-provider connectors and the common hit record they produce.

mod core_api;
mod europeana;

pub use core_api::CoreConnector;
pub use europeana::EuropeanaConnector;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const TITLE_PLACEHOLDER: &str = "(untitled)";
pub const LINK_PLACEHOLDER: &str = "#";

/// Largest slice of an error or unexpected body kept for logs and errors.
const BODY_SNIPPET_BYTES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    Europeana,
    #[serde(rename = "CORE")]
    Core,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Europeana => f.write_str("Europeana"),
            Provider::Core => f.write_str("CORE"),
        }
    }
}

/// One search hit as reported by a provider, before cross-provider ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub title: String,
    pub source: Provider,
    pub link: String,
    pub score: f64,
}

impl Hit {
    /// Applies the shared fallbacks: placeholder title and link, and a
    /// non-negative finite score (0 when absent).
    pub fn new(
        source: Provider,
        title: Option<&str>,
        link: Option<&str>,
        score: Option<f64>,
    ) -> Self {
        Self {
            title: non_blank(title).unwrap_or(TITLE_PLACEHOLDER).to_string(),
            source,
            link: non_blank(link).unwrap_or(LINK_PLACEHOLDER).to_string(),
            score: score.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(0.0),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(reqwest::Error),
}

/// Drops the request URL: query strings may carry provider parameters that
/// must not reach the logs.
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(e.without_url())
        }
    }
}

#[derive(Debug)]
pub enum ProviderOutcome {
    Success(Vec<Hit>),
    Failure(ProviderError),
}

impl From<Result<Vec<Hit>, ProviderError>> for ProviderOutcome {
    fn from(result: Result<Vec<Hit>, ProviderError>) -> Self {
        match result {
            Ok(hits) => ProviderOutcome::Success(hits),
            Err(e) => ProviderOutcome::Failure(e),
        }
    }
}

/// A content source queried with the boolean query string.
///
/// Implementations never panic or return early on provider trouble: every
/// failure is folded into [`ProviderOutcome::Failure`], and a response whose
/// payload does not match the expected shape counts as zero hits.
pub trait Connector: Send + Sync {
    fn provider(&self) -> Provider;

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, ProviderOutcome>;
}

/// Sends `request` and decodes a 2xx JSON body into `T`.
///
/// `Ok(None)` means the provider answered but the payload had an unexpected
/// shape; the raw body is logged.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: Provider,
    request: reqwest::RequestBuilder,
) -> Result<Option<T>, ProviderError> {
    let response = request
        .header("User-Agent", crate::USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            code: status.as_u16(),
            body: snippet(&text).to_string(),
        });
    }

    let text = response.text().await?;

    match serde_json::from_str::<T>(&text) {
        Ok(body) => {
            debug!(%provider, bytes = text.len(), "provider response decoded");
            Ok(Some(body))
        }
        Err(e) => {
            warn!(
                %provider,
                error = %e,
                payload = snippet(&text),
                "unexpected provider payload (treating as zero results)"
            );
            Ok(None)
        }
    }
}

fn snippet(text: &str) -> &str {
    if text.len() > BODY_SNIPPET_BYTES {
        &text[..text.floor_char_boundary(BODY_SNIPPET_BYTES)]
    } else {
        text
    }
}
