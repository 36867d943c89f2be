//! In-memory cache for the fetched image configuration
//!
//! This module provides the cache state shared by all readers of a provider. It
//! keeps the last successfully fetched configuration together with the time it was
//! fetched, and reports expired entries with an `is_expired` flag so callers can
//! keep serving stale data when the remote source is unavailable.

mod state;

pub use state::{CacheState, CachedData};
