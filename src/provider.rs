//! Remote image configuration provider
//!
//! Fetches the image configuration from a JSON endpoint, keeps it cached for a
//! bounded interval and falls back to the built-in defaults whenever nothing
//! usable has been fetched. No error ever escapes the non-`try_` accessors; the
//! worst a caller sees is stale or default data.

use chrono::{DateTime, Utc};
use reqwest::{header::CACHE_CONTROL, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheState, CachedData};
use crate::model::{default_config, ImageConfig, OriginalMap, ThumbnailMap};

/// Endpoint serving the image configuration
pub const CONFIG_URL: &str = "https://s3.kiddihub.com/conf/img.conf.json";

/// How long a fetched configuration is served without refetching
pub const CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Client-side timeout for one fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Errors that can occur while fetching the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a status outside 200-299
    #[error("Unexpected response status: {status} {reason}")]
    Status { status: u16, reason: String },

    /// Body was not a valid configuration document
    #[error("Failed to parse image config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Whether the failure happened after a successful response, while parsing
    pub fn is_parse(&self) -> bool {
        matches!(self, ConfigError::Parse(_))
    }
}

/// Settings for a [`ConfigProvider`]
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// URL the configuration is fetched from
    pub url: String,
    /// Age after which a cached configuration is refetched on read
    pub cache_duration: Duration,
    /// Timeout applied to each request
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: CONFIG_URL.to_string(),
            cache_duration: CACHE_DURATION,
            timeout: FETCH_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    /// Overrides the endpoint URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the cache duration
    pub fn with_cache_duration(mut self, cache_duration: Duration) -> Self {
        self.cache_duration = cache_duration;
        self
    }

    /// Overrides the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug)]
struct Inner {
    client: Client,
    settings: ProviderConfig,
    cache: CacheState,
}

/// Cached, self-refreshing source of the image configuration
///
/// Cloning is cheap; all clones share one cache. Concurrent stale reads are not
/// deduplicated, so each may issue its own request. Only successful fetches write
/// to the cache and the last one to finish wins.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    inner: Arc<Inner>,
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

impl ConfigProvider {
    /// Creates a provider with an empty cache
    pub fn new(settings: ProviderConfig) -> Self {
        Self::with_client(Client::new(), settings)
    }

    /// Creates a provider using a custom HTTP client
    pub fn with_client(client: Client, settings: ProviderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                settings,
                cache: CacheState::new(),
            }),
        }
    }

    /// The settings this provider was built with
    pub fn settings(&self) -> &ProviderConfig {
        &self.inner.settings
    }

    /// Starts the initial background fetch
    ///
    /// Meant to be called once at startup from within a tokio runtime. The task
    /// logs a failed fetch and finishes; readers get the defaults until a later
    /// refresh succeeds. Awaiting the handle is optional.
    pub fn spawn_initial_refresh(&self) -> JoinHandle<()> {
        let provider = self.clone();
        tokio::spawn(async move {
            match provider.try_refresh().await {
                Ok(_) => info!(url = %provider.settings().url, "loaded remote image config"),
                Err(err) => provider.log_fetch_failure("initial", &err),
            }
        })
    }

    /// Returns the cached configuration while fresh, otherwise refreshes
    ///
    /// Always resolves: to the fresh value, the previous cached value, or the
    /// defaults.
    pub async fn get_async(&self) -> Arc<ImageConfig> {
        if let Some(cached) = self.cached() {
            if !cached.is_expired {
                return cached.config;
            }
            debug!(fetched_at = %cached.fetched_at, "cached image config is stale");
        }
        self.refresh().await
    }

    /// Fetches the configuration, falling back to cached-then-default on failure
    ///
    /// The cache is only updated when the fetch succeeds.
    pub async fn refresh(&self) -> Arc<ImageConfig> {
        match self.try_refresh().await {
            Ok(config) => config,
            Err(err) => {
                self.log_fetch_failure("refresh", &err);
                self.current()
            }
        }
    }

    /// Fetches and caches the configuration, returning any failure
    pub async fn try_refresh(&self) -> Result<Arc<ImageConfig>, ConfigError> {
        let settings = &self.inner.settings;
        let response = self
            .inner
            .client
            .get(&settings.url)
            .header(CACHE_CONTROL, "no-cache")
            .timeout(settings.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = response.text().await?;
        let raw: serde_json::Value = serde_json::from_str(&text)?;
        debug!(url = %settings.url, "fetched image config");

        Ok(self.inner.cache.store(ImageConfig::from_value(raw)))
    }

    /// The cached configuration regardless of age, or the defaults
    ///
    /// Never blocks on I/O.
    pub fn current(&self) -> Arc<ImageConfig> {
        self.inner.cache.config().unwrap_or_else(default_config)
    }

    /// Returns a top-level field from the cached-or-default configuration
    ///
    /// Unknown keys yield `None`.
    pub fn field(&self, key: &str) -> Option<serde_json::Value> {
        self.current().field(key)
    }

    /// Thumbnail presets from the cached-or-default configuration
    pub fn thumbnails(&self) -> ThumbnailMap {
        self.current().thumbnails()
    }

    /// Original-upload bounds from the cached-or-default configuration
    pub fn original(&self) -> OriginalMap {
        self.current().original()
    }

    /// The cached configuration with its fetch time, read as one entry
    pub fn cached(&self) -> Option<CachedData> {
        self.inner.cache.read(self.inner.settings.cache_duration)
    }

    /// Time of the last successful fetch, if any
    pub fn last_fetch_time(&self) -> Option<DateTime<Utc>> {
        self.inner.cache.fetched_at()
    }

    /// Whether the next `get_async` call would go to the network
    pub fn is_stale(&self) -> bool {
        self.cached().map_or(true, |cached| cached.is_expired)
    }

    fn log_fetch_failure(&self, stage: &'static str, err: &ConfigError) {
        let url = &self.inner.settings.url;
        if err.is_parse() {
            error!(%url, stage, error = %err, "failed to parse image config");
        } else {
            warn!(%url, stage, error = %err, "failed to fetch image config");
        }
    }
}
