use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Asset loading policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Loading", inline)]
#[serde(default)]
pub struct LoadingOptions {
    /// Upper bound on card asset loads in flight at once.
    #[schemars(title = "Concurrent Loads", range(min = 1, max = 32))]
    pub max_concurrent_loads: usize,
    /// Delivery channel preferred when a model card offers several sources.
    #[schemars(skip)]
    pub preferred_model_channel: String,
}

impl Default for LoadingOptions {
    fn default() -> Self {
        Self {
            max_concurrent_loads: 4,
            preferred_model_channel: "web".to_owned(),
        }
    }
}
