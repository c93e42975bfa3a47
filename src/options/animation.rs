use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Timing for the reveal, reverse and card selection transitions.
pub struct AnimationOptions {
    /// Shape reveal and bob period, also the per-card reverse duration.
    #[schemars(title = "Shape Duration (ms)", range(min = 50, max = 10000))]
    pub shape_duration_ms: u64,
    /// Per-card reveal duration. Unset means twice the shape duration.
    #[schemars(title = "Card Duration (ms)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_duration_ms: Option<u64>,
    /// Expand / condense duration of a selected card's surface stack.
    #[schemars(title = "Select Duration (ms)", range(min = 50, max = 5000))]
    pub card_select_duration_ms: u64,
    /// Fade cards by their distance to the camera-facing reference point.
    #[schemars(title = "Distance Fade")]
    pub distance_fade: bool,
}

impl AnimationOptions {
    /// Duration D1.
    #[must_use]
    pub fn shape_duration(&self) -> Duration {
        Duration::from_millis(self.shape_duration_ms)
    }

    /// Duration D2: the explicit card duration, else `2 × D1`.
    #[must_use]
    pub fn card_duration(&self) -> Duration {
        self.card_duration_ms
            .map_or_else(|| self.shape_duration() * 2, Duration::from_millis)
    }

    /// Expand / condense duration.
    #[must_use]
    pub fn card_select_duration(&self) -> Duration {
        Duration::from_millis(self.card_select_duration_ms)
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            shape_duration_ms: 1000,
            card_duration_ms: None,
            card_select_duration_ms: 800,
            distance_fade: false,
        }
    }
}
