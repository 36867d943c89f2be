//! Built-in image configuration used when nothing has been fetched

use serde_json::json;
use std::sync::{Arc, LazyLock};

use super::ImageConfig;

static DEFAULT_CONFIG: LazyLock<Arc<ImageConfig>> = LazyLock::new(|| Arc::new(build()));

/// Returns the shared fallback configuration
pub fn default_config() -> Arc<ImageConfig> {
    Arc::clone(&DEFAULT_CONFIG)
}

fn build() -> ImageConfig {
    let avatar = json!({
        "mobile": { "width": 90, "height": 90 },
        "tablet": { "width": 111, "height": 111 },
        "desktop": { "width": 160, "height": 160 }
    });
    let school_thumbnail = json!({
        "mobile": [{ "width": 369, "height": 230 }],
        "tablet": [
            { "width": 474, "height": 249 },
            { "width": 318, "height": 165 },
            { "width": 159.19, "height": 82.909 },
            { "width": 159.19, "height": 82.909 }
        ],
        "desktop": [
            { "width": 768, "height": 352 },
            { "width": 512, "height": 235 },
            { "width": 256, "height": 118 },
            { "width": 256, "height": 118 }
        ]
    });
    let school_banner = json!({
        "mobile": { "width": 181, "height": 111 },
        "tablet": { "width": 240, "height": 240 },
        "desktop": { "width": 240, "height": 240 }
    });
    let content = json!({
        "mobile": { "width": 340, "height": 191 },
        "tablet": { "width": 638, "height": 359 },
        "desktop": { "width": 638, "height": 359 }
    });
    let edu_banner = json!({
        "mobile": { "width": 414, "height": 263 },
        "tablet": { "width": 1920, "height": 584 },
        "desktop": { "width": 1920, "height": 584 }
    });
    let original = json!({
        "school-photos": { "max_width": 966, "max_height": 644 },
        "content": { "max_width": 966, "max_height": 644 },
        "og-images": { "max_width": 600, "max_height": 315 }
    });

    ImageConfig::from_value(json!({
        "thumbnails": {
            "avatar": avatar,
            "school-thumbnail": school_thumbnail,
            "school-banner": school_banner,
            "content": content,
            "edu-banner": edu_banner
        },
        "original": original
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Breakpoint, Dimensions, OriginalBounds, ThumbnailSpec};

    #[test]
    fn test_default_categories() {
        let thumbnails = default_config().thumbnails();
        let categories: Vec<&str> = thumbnails.keys().map(String::as_str).collect();
        assert_eq!(
            categories,
            vec!["avatar", "content", "edu-banner", "school-banner", "school-thumbnail"]
        );
        assert!(thumbnails.values().all(|tiers| tiers.len() == 3));
        assert_eq!(default_config().original().len(), 3);
    }

    #[test]
    fn test_default_avatar_sizes() {
        let desktop = default_config()
            .thumbnail("avatar", Breakpoint::Desktop)
            .and_then(|spec| spec.primary());
        assert_eq!(desktop, Some(Dimensions::new(160.0, 160.0)));
    }

    #[test]
    fn test_default_school_thumbnail_variants() {
        let config = default_config();
        let tablet = config
            .thumbnail("school-thumbnail", Breakpoint::Tablet)
            .expect("tablet preset should exist");
        assert_eq!(tablet.variants().len(), 4);
        assert!((tablet.variants()[2].width - 159.19).abs() < 1e-9);
        assert!((tablet.variants()[2].height - 82.909).abs() < 1e-9);

        let mobile = config
            .thumbnail("school-thumbnail", Breakpoint::Mobile)
            .expect("mobile preset should exist");
        assert!(matches!(mobile, ThumbnailSpec::Variants(ref v) if v.len() == 1));
    }

    #[test]
    fn test_default_original_bounds() {
        let config = default_config();
        assert_eq!(
            config.original_bounds("og-images"),
            Some(OriginalBounds { max_width: 600.0, max_height: 315.0 })
        );
        assert_eq!(
            config.original_bounds("school-photos"),
            Some(OriginalBounds { max_width: 966.0, max_height: 644.0 })
        );
    }

    #[test]
    fn test_default_is_shared() {
        assert!(Arc::ptr_eq(&default_config(), &default_config()));
    }
}
