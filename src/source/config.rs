// src/source/config.rs
//! Source URL resolution. Each sheet is addressed by a secret key
//! (`funding_data_url`, ...); the binary resolves them from the Shuttle secret
//! store, tests and local runs from upper-cased env vars (`FUNDING_DATA_URL`, ...).

use std::collections::HashMap;
use std::time::Duration;

pub const FUNDING_DATA: &str = "funding_data_url";
pub const FUNDING_HISTORY: &str = "funding_history_url";
pub const NEWS_DATA: &str = "news_data_url";

pub const SOURCE_KEYS: [&str; 3] = [FUNDING_DATA, FUNDING_HISTORY, NEWS_DATA];

const ENV_CACHE_TTL_SECS: &str = "SOURCE_CACHE_TTL_SECS";
const ENV_HTTP_TIMEOUT_SECS: &str = "SOURCE_HTTP_TIMEOUT_SECS";
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    urls: HashMap<String, String>,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
}

impl SourceConfig {
    /// Resolve every known source key through `lookup`; blanks count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut urls = HashMap::new();
        for key in SOURCE_KEYS {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(url) if !url.is_empty() => {
                    urls.insert(key.to_string(), url);
                }
                _ => tracing::warn!(target: "source", key, "source url not configured"),
            }
        }
        Self {
            urls,
            cache_ttl: Duration::from_secs(env_secs(ENV_CACHE_TTL_SECS, DEFAULT_CACHE_TTL_SECS)),
            http_timeout: Duration::from_secs(env_secs(
                ENV_HTTP_TIMEOUT_SECS,
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        }
    }

    /// Resolve from env vars named after the upper-cased key.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key.to_ascii_uppercase()).ok())
    }

    pub fn url_for(&self, source_id: &str) -> Option<&str> {
        self.urls.get(source_id).map(String::as_str)
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
