use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::thing::validate::parse_hex_color;

/// Fallback colors used when the Thing document carries none (or invalid
/// ones).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// Renderer clear color as `#RGB` or `#RRGGBB`.
    #[schemars(title = "Background")]
    pub background: String,
    /// Shape material color as `#RGB` or `#RRGGBB`.
    #[schemars(title = "Mesh")]
    pub mesh: String,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            background: "#222222".to_owned(),
            mesh: "#fafafa".to_owned(),
        }
    }
}

impl ColorOptions {
    /// Resolve a document color, falling back to `default` and finally to
    /// mid gray if the configured default is itself malformed.
    #[must_use]
    pub fn resolve(candidate: Option<&str>, default: &str) -> [f32; 3] {
        candidate
            .and_then(parse_hex_color)
            .or_else(|| {
                if let Some(value) = candidate {
                    log::warn!("invalid hex color {value:?}, using {default}");
                }
                parse_hex_color(default)
            })
            .unwrap_or([0.5, 0.5, 0.5])
    }

    /// Clear color for the renderer.
    #[must_use]
    pub fn background_rgb(&self, candidate: Option<&str>) -> [f32; 3] {
        Self::resolve(candidate, &self.background)
    }

    /// Material color for parametric shapes.
    #[must_use]
    pub fn mesh_rgb(&self, candidate: Option<&str>) -> [f32; 3] {
        Self::resolve(candidate, &self.mesh)
    }
}
