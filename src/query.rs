//! Boolean query construction: OR within a term's synonym group, AND across groups.

use futures::future::join_all;

use crate::expand::SynonymSource;

pub struct QueryBuilder<S> {
    synonyms: S,
}

impl<S: SynonymSource> QueryBuilder<S> {
    pub fn new(synonyms: S) -> Self {
        Self { synonyms }
    }

    /// Builds the boolean query for `raw`. Returns an empty string when `raw`
    /// holds no terms; callers must treat that as "nothing to search".
    pub async fn build(&self, raw: &str) -> String {
        let terms = split_terms(raw);
        if terms.is_empty() {
            return String::new();
        }

        let expansions = join_all(terms.iter().map(|t| self.synonyms.expand(t))).await;

        terms
            .iter()
            .zip(expansions)
            .map(|(term, synonyms)| render_group(term, &synonyms))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

pub fn split_terms(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Renders one term and its synonyms as a bare term or `(a OR b ...)`.
/// Members are deduplicated in first-seen order with the term itself first.
pub fn render_group(term: &str, synonyms: &[String]) -> String {
    let mut members: Vec<String> = Vec::with_capacity(synonyms.len() + 1);
    for candidate in std::iter::once(term).chain(synonyms.iter().map(String::as_str)) {
        let member = quote_phrase(candidate);
        if !member.is_empty() && !members.contains(&member) {
            members.push(member);
        }
    }

    match members.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", members.join(" OR ")),
    }
}

fn quote_phrase(word: &str) -> String {
    let word = word.trim();
    if word.contains(char::is_whitespace) {
        format!("\"{}\"", word.replace('"', ""))
    } else {
        word.to_string()
    }
}
