//! Cache state holding the last fetched configuration
//!
//! The configuration and its fetch timestamp are stored as a single entry behind
//! one lock, so readers always see a matching pair.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::model::ImageConfig;

/// A stored configuration and the moment it was fetched
#[derive(Debug, Clone)]
struct CacheEntry {
    config: Arc<ImageConfig>,
    fetched_at: DateTime<Utc>,
}

/// Result of reading from the cache, including metadata about freshness
#[derive(Debug, Clone)]
pub struct CachedData {
    /// The cached configuration
    pub config: Arc<ImageConfig>,
    /// When the configuration was fetched
    pub fetched_at: DateTime<Utc>,
    /// Whether the entry is older than the requested time-to-live
    pub is_expired: bool,
}

/// Process-lifetime cache of the remote configuration
///
/// Starts empty. An entry is only ever replaced as a whole, and only by a
/// successful fetch.
#[derive(Debug, Default)]
pub struct CacheState {
    entry: RwLock<Option<CacheEntry>>,
}

impl CacheState {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly fetched configuration, stamped with the current time
    ///
    /// Returns the shared handle to the stored value.
    pub fn store(&self, config: ImageConfig) -> Arc<ImageConfig> {
        self.store_at(config, Utc::now())
    }

    /// Stores a configuration with an explicit fetch time
    pub fn store_at(&self, config: ImageConfig, fetched_at: DateTime<Utc>) -> Arc<ImageConfig> {
        let config = Arc::new(config);
        *self.entry.write() = Some(CacheEntry {
            config: Arc::clone(&config),
            fetched_at,
        });
        config
    }

    /// Reads the cached entry, flagging it as expired once `ttl` has elapsed
    ///
    /// Returns `None` only while nothing has been fetched yet.
    pub fn read(&self, ttl: Duration) -> Option<CachedData> {
        let entry = self.entry.read().clone()?;
        Some(CachedData {
            is_expired: is_expired(entry.fetched_at, ttl),
            config: entry.config,
            fetched_at: entry.fetched_at,
        })
    }

    /// The cached configuration regardless of age
    pub fn config(&self) -> Option<Arc<ImageConfig>> {
        self.entry.read().as_ref().map(|entry| Arc::clone(&entry.config))
    }

    /// Time of the last successful fetch
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().as_ref().map(|entry| entry.fetched_at)
    }
}

fn is_expired(fetched_at: DateTime<Utc>, ttl: Duration) -> bool {
    // A negative age means the wall clock moved backwards; keep the entry.
    match (Utc::now() - fetched_at).to_std() {
        Ok(age) => age >= ttl,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;

    fn sample_config(max_width: f64) -> ImageConfig {
        ImageConfig::from_value(json!({
            "original": { "content": { "max_width": max_width, "max_height": 644 } }
        }))
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = CacheState::new();
        assert!(cache.read(Duration::from_secs(300)).is_none());
        assert!(cache.config().is_none());
        assert!(cache.fetched_at().is_none());
    }

    #[test]
    fn test_store_sets_config_and_timestamp_together() {
        let cache = CacheState::new();
        let before = Utc::now();
        let stored = cache.store(sample_config(966.0));
        let after = Utc::now();

        let fetched_at = cache.fetched_at().expect("timestamp should be set");
        assert!(fetched_at >= before && fetched_at <= after);
        assert!(Arc::ptr_eq(&stored, &cache.config().expect("config should be set")));
    }

    #[test]
    fn test_read_returns_fresh_entry() {
        let cache = CacheState::new();
        cache.store(sample_config(966.0));

        let cached = cache.read(Duration::from_secs(300)).expect("should read cache");
        assert!(!cached.is_expired);
        assert_eq!(*cached.config, sample_config(966.0));
    }

    #[test]
    fn test_read_flags_expired_entry() {
        let cache = CacheState::new();
        cache.store_at(sample_config(966.0), Utc::now() - ChronoDuration::minutes(6));

        let cached = cache.read(Duration::from_secs(300)).expect("should read cache");
        assert!(cached.is_expired, "entry older than ttl should be expired");
        assert_eq!(*cached.config, sample_config(966.0));
    }

    #[test]
    fn test_zero_ttl_is_always_expired() {
        let cache = CacheState::new();
        cache.store(sample_config(1.0));
        assert!(cache.read(Duration::ZERO).expect("should read").is_expired);
    }

    #[test]
    fn test_future_timestamp_is_not_expired() {
        let cache = CacheState::new();
        cache.store_at(sample_config(1.0), Utc::now() + ChronoDuration::minutes(1));
        assert!(!cache.read(Duration::ZERO).expect("should read").is_expired);
    }

    #[test]
    fn test_store_replaces_previous_entry() {
        let cache = CacheState::new();
        cache.store(sample_config(1.0));
        cache.store(sample_config(2.0));

        let cached = cache.config().expect("config should be set");
        assert_eq!(cached.original_bounds("content").map(|b| b.max_width), Some(2.0));
    }
}
