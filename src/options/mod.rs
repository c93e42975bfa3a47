//! Centralized carousel options with TOML preset support.
//!
//! Layout sizes, transition timing, fallback colors and the loading policy
//! are consolidated here. Options serialize to/from TOML so hosts can ship
//! presets next to their Thing documents.

mod animation;
mod colors;
mod layout;
mod loading;

use std::path::Path;

pub use animation::AnimationOptions;
pub use colors::ColorOptions;
pub use layout::LayoutOptions;
pub use loading::LoadingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CarouselError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[animation]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct CarouselOptions {
    /// Card, gap and shape sizes.
    pub layout: LayoutOptions,
    /// Transition durations and the distance fade toggle.
    pub animation: AnimationOptions,
    /// Fallback colors.
    pub colors: ColorOptions,
    /// Asset loading policy.
    pub loading: LoadingOptions,
}

impl CarouselOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(CarouselOptions)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, CarouselError> {
        toml::from_str(content)
            .map_err(|e| CarouselError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, CarouselError> {
        let content = std::fs::read_to_string(path).map_err(CarouselError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), CarouselError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CarouselError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CarouselError::Io)?;
        }
        std::fs::write(path, content).map_err(CarouselError::Io)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = CarouselOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: CarouselOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[animation]
shape_duration_ms = 500
card_duration_ms = 1000
";
        let opts = CarouselOptions::from_toml(toml_str).unwrap();
        assert_eq!(opts.animation.shape_duration_ms, 500);
        assert_eq!(opts.animation.card_duration_ms, Some(1000));
        assert_eq!(opts.animation.card_select_duration_ms, 800);
        assert_eq!(opts.layout.card_width, 16.0);
        assert_eq!(opts.loading.max_concurrent_loads, 4);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = CarouselOptions::from_toml("[layout\ncard_width = ").unwrap_err();
        assert!(matches!(err, CarouselError::OptionsParse(_)));
    }

    #[test]
    fn card_duration_defaults_to_twice_shape_duration() {
        let anim = AnimationOptions::default();
        assert_eq!(anim.card_duration(), anim.shape_duration() * 2);
    }

    #[test]
    fn card_duration_follows_partial_shape_override() {
        let opts =
            CarouselOptions::from_toml("[animation]\nshape_duration_ms = 500\n")
                .unwrap();
        assert_eq!(opts.animation.shape_duration(), Duration::from_millis(500));
        assert_eq!(opts.animation.card_duration(), Duration::from_secs(1));

        let explicit = CarouselOptions::from_toml(
            "[animation]\nshape_duration_ms = 500\ncard_duration_ms = 3000\n",
        )
        .unwrap();
        assert_eq!(explicit.animation.card_duration(), Duration::from_secs(3));
    }

    #[test]
    fn min_radius_is_relative_to_shape() {
        let layout = LayoutOptions::default();
        assert!((layout.min_radius() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn color_fallbacks() {
        let colors = ColorOptions::default();
        assert_eq!(colors.mesh_rgb(Some("#f00")), [1.0, 0.0, 0.0]);
        let gray = 0x22 as f32 / 255.0;
        assert_eq!(colors.background_rgb(Some("red")), [gray, gray, gray]);
        assert_eq!(colors.background_rgb(None), [gray, gray, gray]);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(CarouselOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("layout"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("colors"));
        assert!(props.contains_key("loading"));

        let layout = &props["layout"]["properties"];
        assert!(layout.get("card_width").is_some());
        assert!(layout.get("surface_spacing").is_none());
    }
}
