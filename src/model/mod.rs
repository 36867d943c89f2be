//! Image configuration data model
//!
//! This module contains the types describing image-resize presets: thumbnail
//! dimensions per breakpoint and per content category, and the bounds applied to
//! original uploads.
//!
//! The fetched document is kept exactly as received. Typed views are derived from
//! it on demand and skip entries that do not fit, so a partially-correct document
//! still yields whatever presets it does describe.

mod defaults;

pub use defaults::default_config;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Thumbnail presets keyed by category, then by breakpoint name
pub type ThumbnailMap = BTreeMap<String, BTreeMap<String, ThumbnailSpec>>;

/// Original-image bounds keyed by category
pub type OriginalMap = BTreeMap<String, OriginalBounds>;

/// Responsive-design tier an image is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// Key used for this breakpoint in the remote configuration
    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

/// Target width and height of a resized image
///
/// Values are not necessarily integral; some presets carry fractional sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Preset for one category at one breakpoint
///
/// The remote payload uses either a single `{width, height}` object or an
/// ordered array of them (crop variants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThumbnailSpec {
    /// One fixed size
    Single(Dimensions),
    /// Alternate crops, largest first
    Variants(Vec<Dimensions>),
}

impl ThumbnailSpec {
    /// Reads a preset from JSON, keeping only the crop variants that fit
    ///
    /// Returns `None` for anything that is neither a size object nor an array.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(ThumbnailSpec::Variants(
                items.iter().filter_map(dimensions_from).collect(),
            )),
            Value::Object(_) => dimensions_from(value).map(ThumbnailSpec::Single),
            _ => None,
        }
    }

    /// All crop variants as a slice; a single size yields one element
    pub fn variants(&self) -> &[Dimensions] {
        match self {
            ThumbnailSpec::Single(dims) => std::slice::from_ref(dims),
            ThumbnailSpec::Variants(list) => list,
        }
    }

    /// The first (primary) size, if any
    pub fn primary(&self) -> Option<Dimensions> {
        self.variants().first().copied()
    }
}

fn dimensions_from(value: &Value) -> Option<Dimensions> {
    Dimensions::deserialize(value).ok()
}

/// Maximum size an original upload is scaled down to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginalBounds {
    pub max_width: f64,
    pub max_height: f64,
}

/// The full image configuration snapshot
///
/// Wraps the JSON document as fetched. Any syntactically valid document is
/// accepted; nothing about its shape is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageConfig {
    raw: Value,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }
}

impl From<Value> for ImageConfig {
    fn from(raw: Value) -> Self {
        Self::from_value(raw)
    }
}

impl ImageConfig {
    /// Wraps a parsed JSON document
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The document exactly as received
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Returns a top-level field as received, or `None` if it is absent
    pub fn field(&self, key: &str) -> Option<Value> {
        self.raw.get(key).cloned()
    }

    /// Thumbnail presets that fit the expected shape
    ///
    /// Categories that are not objects and breakpoint entries that are not
    /// presets are left out.
    pub fn thumbnails(&self) -> ThumbnailMap {
        let Some(categories) = self.raw.get("thumbnails").and_then(Value::as_object) else {
            return ThumbnailMap::new();
        };

        categories
            .iter()
            .filter_map(|(category, tiers)| {
                let tiers: BTreeMap<String, ThumbnailSpec> = tiers
                    .as_object()?
                    .iter()
                    .filter_map(|(name, spec)| {
                        ThumbnailSpec::from_value(spec).map(|spec| (name.clone(), spec))
                    })
                    .collect();
                Some((category.clone(), tiers))
            })
            .collect()
    }

    /// Original-upload bounds that fit the expected shape
    pub fn original(&self) -> OriginalMap {
        let Some(categories) = self.raw.get("original").and_then(Value::as_object) else {
            return OriginalMap::new();
        };

        categories
            .iter()
            .filter_map(|(category, bounds)| {
                let bounds = OriginalBounds::deserialize(bounds).ok()?;
                Some((category.clone(), bounds))
            })
            .collect()
    }

    /// Looks up the preset for a category at a breakpoint
    pub fn thumbnail(&self, category: &str, breakpoint: Breakpoint) -> Option<ThumbnailSpec> {
        let spec = self
            .raw
            .get("thumbnails")?
            .get(category)?
            .get(breakpoint.as_str())?;
        ThumbnailSpec::from_value(spec)
    }

    /// Looks up the original-upload bounds for a category
    pub fn original_bounds(&self, category: &str) -> Option<OriginalBounds> {
        let bounds = self.raw.get("original")?.get(category)?;
        OriginalBounds::deserialize(bounds).ok()
    }
}
