//! Image configuration provider
//!
//! Serves image-resize presets (thumbnail sizes per breakpoint and content
//! category) fetched from a remote JSON document, cached for a bounded interval,
//! with a built-in default used whenever the remote source is unavailable.

pub mod cache;
pub mod logging;
pub mod model;
pub mod provider;

pub use cache::CachedData;
pub use model::{
    default_config, Breakpoint, Dimensions, ImageConfig, OriginalBounds, ThumbnailSpec,
};
pub use provider::{
    ConfigError, ConfigProvider, ProviderConfig, CACHE_DURATION, CONFIG_URL, FETCH_TIMEOUT,
};
