//! Concurrent provider fan-out, score normalization and ranking.
//!
//! Every connector is queried at once and all outcomes are awaited; a failed
//! provider contributes nothing and never holds back the others. Scores are
//! divided by the request-wide maximum (floor 0), then sorted descending with
//! a stable sort, so equal scores keep connector-declaration order and, within
//! one connector, the order the provider reported.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::providers::{Connector, Hit, Provider, ProviderOutcome};

/// One ranked hit as returned to callers. Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub title: String,
    pub source: Provider,
    pub link: String,
    pub original_relevance_score: f64,
    pub normalized_score: f64,
}

pub async fn aggregate(query: &str, connectors: &[Box<dyn Connector>]) -> Vec<ResultRecord> {
    if query.is_empty() {
        return Vec::new();
    }

    let outcomes = join_all(connectors.iter().map(|c| c.search(query))).await;

    let mut hits = Vec::new();
    for (connector, outcome) in connectors.iter().zip(outcomes) {
        let provider = connector.provider();
        match outcome {
            ProviderOutcome::Success(found) => {
                debug!(%provider, count = found.len(), "provider returned results");
                hits.extend(found);
            }
            ProviderOutcome::Failure(e) => {
                warn!(%provider, error = %e, "provider search failed (continuing with other providers)");
            }
        }
    }

    rank(hits)
}

/// Normalizes `hits` against their maximum score and sorts them descending.
pub fn rank(hits: Vec<Hit>) -> Vec<ResultRecord> {
    let max = hits.iter().map(|h| h.score).fold(0.0_f64, f64::max);
    let divisor = if max > 0.0 { max } else { 1.0 };

    let mut records: Vec<ResultRecord> = hits
        .into_iter()
        .map(|hit| ResultRecord {
            normalized_score: hit.score / divisor,
            original_relevance_score: hit.score,
            title: hit.title,
            source: hit.source,
            link: hit.link,
        })
        .collect();

    sort_by_score(&mut records);
    records
}

/// Stable: ties keep their current relative order.
pub fn sort_by_score(records: &mut [ResultRecord]) {
    records.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
}
