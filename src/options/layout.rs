use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
/// Physical sizes used by the ring layout and card construction.
pub struct LayoutOptions {
    /// Width of a card plane in world units.
    #[schemars(title = "Card Width", range(min = 1.0, max = 64.0), extend("step" = 0.5))]
    pub card_width: f32,
    /// Height of a card plane in world units.
    #[schemars(title = "Card Height", range(min = 1.0, max = 64.0), extend("step" = 0.5))]
    pub card_height: f32,
    /// Minimum gap between adjacent cards along the ring.
    #[schemars(title = "Card Gap", range(min = 0.0, max = 32.0), extend("step" = 0.5))]
    pub card_gap: f32,
    /// Largest extent of the central shape.
    #[schemars(title = "Shape Size", range(min = 1.0, max = 50.0), extend("step" = 0.5))]
    pub shape_size: f32,
    /// Ring radius floor as a multiple of `shape_size`.
    #[schemars(skip)]
    pub min_radius_factor: f32,
    /// Depth offset between stacked surfaces of one card.
    #[schemars(skip)]
    pub surface_spacing: f32,
    /// Model cards are scaled so their largest extent is this fraction of
    /// `card_height`.
    #[schemars(skip)]
    pub model_card_fraction: f32,
}

impl LayoutOptions {
    /// Ring radius floor: cards never sit inside the shape's silhouette.
    #[must_use]
    pub fn min_radius(&self) -> f32 {
        self.shape_size * self.min_radius_factor
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            card_width: 16.0,
            card_height: 20.0,
            card_gap: 16.0 / 3.0,
            shape_size: 10.0,
            min_radius_factor: 1.5,
            surface_spacing: 1.0,
            model_card_fraction: 0.5,
        }
    }
}
