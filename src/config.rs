use std::env;
use std::time::Duration;

use url::{Host, Url};

const DEFAULT_DATAMUSE_URL: &str = "https://api.datamuse.com/words";
const DEFAULT_EUROPEANA_URL: &str = "https://api.europeana.eu/record/v2/search.json";
const DEFAULT_CORE_URL: &str = "https://api.core.ac.uk/v3/search/works";
const DEFAULT_MAX_SYNONYMS: u8 = 5;
const DEFAULT_ROWS: u16 = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_ROWS: u16 = 100;
const MAX_SYNONYMS: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set. A provider credential is required to start")]
    MissingCredential(&'static str),

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },

    #[error("{var} must use https (plain http is only accepted for loopback hosts), got '{url}'")]
    InsecureUrl { var: &'static str, url: String },

    #[error("{var} must be a number between {min} and {max}, got '{value}'")]
    OutOfRange {
        var: &'static str,
        value: String,
        min: u64,
        max: u64,
    },
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub api_key: ApiKey,
    pub rows: u16,
}

/// Process-wide settings, read once at startup and never mutated.
///
/// Environment variables:
/// - `EUROPEANA_API_KEY`, `CORE_API_KEY`: required
/// - `DATAMUSE_URL`, `EUROPEANA_URL`, `CORE_URL`: endpoint overrides
/// - `TRAWL_MAX_SYNONYMS`, `EUROPEANA_ROWS`, `CORE_LIMIT`, `TRAWL_TIMEOUT_SECS`
#[derive(Debug, Clone)]
pub struct Config {
    pub datamuse_url: Url,
    pub max_synonyms: u8,
    pub europeana: ProviderConfig,
    pub core: ProviderConfig,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let europeana_key = get("EUROPEANA_API_KEY")
            .ok_or(ConfigError::MissingCredential("EUROPEANA_API_KEY"))?;
        let core_key = get("CORE_API_KEY").ok_or(ConfigError::MissingCredential("CORE_API_KEY"))?;

        let timeout_secs = parse_number(
            "TRAWL_TIMEOUT_SECS",
            get("TRAWL_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
            1,
            300,
        )?;

        Ok(Self {
            datamuse_url: parse_url("DATAMUSE_URL", get("DATAMUSE_URL"), DEFAULT_DATAMUSE_URL)?,
            max_synonyms: parse_number(
                "TRAWL_MAX_SYNONYMS",
                get("TRAWL_MAX_SYNONYMS"),
                DEFAULT_MAX_SYNONYMS.into(),
                1,
                MAX_SYNONYMS.into(),
            )? as u8,
            europeana: ProviderConfig {
                base_url: parse_credentialed_url(
                    "EUROPEANA_URL",
                    get("EUROPEANA_URL"),
                    DEFAULT_EUROPEANA_URL,
                )?,
                api_key: ApiKey(europeana_key),
                rows: parse_number(
                    "EUROPEANA_ROWS",
                    get("EUROPEANA_ROWS"),
                    DEFAULT_ROWS.into(),
                    1,
                    MAX_ROWS.into(),
                )? as u16,
            },
            core: ProviderConfig {
                base_url: parse_credentialed_url("CORE_URL", get("CORE_URL"), DEFAULT_CORE_URL)?,
                api_key: ApiKey(core_key),
                rows: parse_number(
                    "CORE_LIMIT",
                    get("CORE_LIMIT"),
                    DEFAULT_ROWS.into(),
                    1,
                    MAX_ROWS.into(),
                )? as u16,
            },
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_url(var: &'static str, value: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.as_deref().unwrap_or(default);
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}

/// Endpoints that receive an API key: https, or http to a loopback host
/// (local mock servers).
fn parse_credentialed_url(
    var: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<Url, ConfigError> {
    let url = parse_url(var, value, default)?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback(&url) => Ok(url),
        _ => Err(ConfigError::InsecureUrl {
            var,
            url: url.to_string(),
        }),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn parse_number(
    var: &'static str,
    value: Option<String>,
    default: u64,
    min: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.parse::<u64>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(ConfigError::OutOfRange {
            var,
            value,
            min,
            max,
        }),
    }
}

#[cfg(test)]
pub(crate) fn test_config(datamuse: &str, europeana: &str, core: &str) -> Config {
    Config::from_lookup(|key| match key {
        "EUROPEANA_API_KEY" => Some("eu-key".into()),
        "CORE_API_KEY" => Some("core-key".into()),
        "DATAMUSE_URL" => Some(datamuse.into()),
        "EUROPEANA_URL" => Some(europeana.into()),
        "CORE_URL" => Some(core.into()),
        "TRAWL_TIMEOUT_SECS" => Some("2".into()),
        _ => None,
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 2] = [("EUROPEANA_API_KEY", "eu"), ("CORE_API_KEY", "core")];

    #[test]
    fn defaults_applied_when_only_keys_set() {
        let config = Config::from_lookup(lookup_from(&KEYS)).unwrap();
        assert_eq!(config.datamuse_url.as_str(), DEFAULT_DATAMUSE_URL);
        assert_eq!(config.max_synonyms, 5);
        assert_eq!(config.europeana.rows, 20);
        assert_eq!(config.core.rows, 20);
        assert_eq!(config.core.base_url.as_str(), DEFAULT_CORE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.europeana.api_key.expose(), "eu");
    }

    #[test]
    fn missing_europeana_key_fails() {
        let err = Config::from_lookup(lookup_from(&[("CORE_API_KEY", "core")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential("EUROPEANA_API_KEY")));
    }

    #[test]
    fn blank_core_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("EUROPEANA_API_KEY", "eu"),
            ("CORE_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CORE_API_KEY"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            KEYS[0],
            KEYS[1],
            ("EUROPEANA_ROWS", "50"),
            ("CORE_LIMIT", " 7 "),
            ("TRAWL_MAX_SYNONYMS", "3"),
            ("TRAWL_TIMEOUT_SECS", "4"),
            ("DATAMUSE_URL", "http://localhost:9000/words"),
        ]))
        .unwrap();
        assert_eq!(config.europeana.rows, 50);
        assert_eq!(config.core.rows, 7);
        assert_eq!(config.max_synonyms, 3);
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.datamuse_url.as_str(), "http://localhost:9000/words");
    }

    #[test]
    fn out_of_range_rows_rejected() {
        let err =
            Config::from_lookup(lookup_from(&[KEYS[0], KEYS[1], ("EUROPEANA_ROWS", "0")]))
                .unwrap_err();
        assert!(err.to_string().contains("EUROPEANA_ROWS"), "got: {err}");
    }

    #[test]
    fn non_numeric_timeout_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            KEYS[0],
            KEYS[1],
            ("TRAWL_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { var: "TRAWL_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn malformed_url_rejected() {
        let err = Config::from_lookup(lookup_from(&[KEYS[0], KEYS[1], ("CORE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "CORE_URL", .. }));
    }

    #[test]
    fn synonym_cap_is_five() {
        let config =
            Config::from_lookup(lookup_from(&[KEYS[0], KEYS[1], ("TRAWL_MAX_SYNONYMS", "5")]))
                .unwrap();
        assert_eq!(config.max_synonyms, 5);

        let err =
            Config::from_lookup(lookup_from(&[KEYS[0], KEYS[1], ("TRAWL_MAX_SYNONYMS", "6")]))
                .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { var: "TRAWL_MAX_SYNONYMS", max: 5, .. }
        ));
    }

    #[test]
    fn plain_http_provider_url_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            KEYS[0],
            KEYS[1],
            ("CORE_URL", "http://api.core.example/v3/search/works"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureUrl { var: "CORE_URL", .. }));

        let err = Config::from_lookup(lookup_from(&[
            KEYS[0],
            KEYS[1],
            ("EUROPEANA_URL", "ftp://api.europeana.example/search"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureUrl { var: "EUROPEANA_URL", .. }));
    }

    #[test]
    fn plain_http_allowed_for_loopback() {
        let config = Config::from_lookup(lookup_from(&[
            KEYS[0],
            KEYS[1],
            ("CORE_URL", "http://127.0.0.1:8080/core"),
            ("EUROPEANA_URL", "http://localhost:8080/eu"),
        ]))
        .unwrap();
        assert_eq!(config.core.base_url.scheme(), "http");
        assert_eq!(config.europeana.base_url.host_str(), Some("localhost"));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let config = Config::from_lookup(lookup_from(&KEYS)).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("\"eu\""));
    }
}
