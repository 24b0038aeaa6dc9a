use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectorConfig {
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub own_ui: OwnUiConfig,
}

/// What goes into a selection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Characters of text kept before truncating with an ellipsis.
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,
    /// Attribute names left out of records.
    #[serde(default)]
    pub omit_attributes: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            text_limit: default_text_limit(),
            omit_attributes: Vec::new(),
        }
    }
}

fn default_text_limit() -> usize {
    200
}

/// How the inspector recognizes its own overlay elements, which are never
/// selectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnUiConfig {
    #[serde(default = "default_own_ids")]
    pub ids: Vec<String>,
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,
}

impl Default for OwnUiConfig {
    fn default() -> Self {
        Self {
            ids: default_own_ids(),
            marker_attribute: default_marker_attribute(),
        }
    }
}

fn default_own_ids() -> Vec<String> {
    vec![
        "__agentation-overlay__".to_string(),
        "__agentation-tooltip__".to_string(),
        "__agentation-popover__".to_string(),
    ]
}

fn default_marker_attribute() -> String {
    "data-agt-own".to_string()
}
