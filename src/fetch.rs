//! Subscription ingestion: URL list parsing, HTTP fetching with retry, and
//! extraction of raw node descriptors from the YAML payload.

use crate::Result;
use anyhow::{anyhow, bail};
use reqwest::Client;
use serde_yaml::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for a subscription request in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Attempts per subscription before giving up
const DEFAULT_RETRIES: u32 = 2;

/// Pause between retry attempts
const RETRY_PAUSE: Duration = Duration::from_secs(2);

/// User agent expected by subscription providers
const DEFAULT_USER_AGENT: &str = "ClashMetaForAndroid/2.10.1.Meta Mihomo/1.18";

/// Parse the subscription list file.
///
/// Expected shape:
/// ```yaml
/// urls:
///   - https://example.com/sub1.yaml
///   - https://example.com/sub2.yaml
/// ```
/// Non-string entries and entries not starting with `http` are ignored.
pub fn read_urls(content: &str) -> Result<Vec<String>> {
    let data: Value = serde_yaml::from_str(content)
        .map_err(|e| anyhow!("subscription list is not valid YAML: {e}"))?;

    let Value::Mapping(map) = data else {
        bail!("subscription list must be a mapping with a 'urls' field");
    };
    let Some(Value::Sequence(entries)) = map.get("urls") else {
        bail!("subscription list is missing a 'urls' list");
    };

    let urls = entries
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|u| u.starts_with("http"))
        .map(str::to_string)
        .collect();

    Ok(urls)
}

/// Configuration for the subscription fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Timeout for each HTTP request
    pub timeout: Duration,
    /// Attempts per URL
    pub retries: u32,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Fetches subscription documents over HTTP.
pub struct Fetcher {
    config: FetcherConfig,
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { config, client })
    }

    /// Fetch one subscription, retrying on failure. Returns `None` once all
    /// attempts are exhausted; a dead subscription never fails the caller.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        for attempt in 1..=self.config.retries {
            info!(attempt, retries = self.config.retries, url, "fetching subscription");
            match self.try_fetch(url).await {
                Ok(body) => return Some(body),
                Err(e) => {
                    warn!(url, error = %e, "subscription request failed");
                    if attempt < self.config.retries {
                        tokio::time::sleep(RETRY_PAUSE).await;
                    }
                }
            }
        }
        None
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Pull the raw node descriptor list out of a subscription document.
///
/// Accepts both a full client config (`proxies:` key) and the provider
/// payload shape (`payload:` key). Anything else, including YAML that fails
/// to parse, yields an empty list.
pub fn extract_nodes(raw: &str) -> Vec<Value> {
    let data: Value = match serde_yaml::from_str(raw) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "subscription payload is not valid YAML");
            return Vec::new();
        }
    };

    let Value::Mapping(map) = data else {
        return Vec::new();
    };

    for key in ["proxies", "payload"] {
        if let Some(Value::Sequence(entries)) = map.get(key) {
            return entries.clone();
        }
    }

    Vec::new()
}
