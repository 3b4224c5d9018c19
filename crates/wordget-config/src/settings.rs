use serde::{Deserialize, Serialize};

fn default_translation_api() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_target_language() -> String {
    "zh-CN".to_string()
}

/// User-facing settings record persisted under the `settings` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "translationAPI", default = "default_translation_api")]
    pub translation_api: String,
    #[serde(default)]
    pub api_key: String,
    /// Open the side panel after each capture
    #[serde(default = "default_enabled")]
    pub auto_open_sidebar: bool,
    /// Store the surrounding sentence with each word
    #[serde(default = "default_enabled")]
    pub capture_context: bool,
    #[serde(default = "default_enabled")]
    pub adaptive_theme: bool,
    #[serde(default = "default_enabled")]
    pub show_translation_tooltip: bool,
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translation_api: default_translation_api(),
            api_key: String::new(),
            auto_open_sidebar: default_enabled(),
            capture_context: default_enabled(),
            adaptive_theme: default_enabled(),
            show_translation_tooltip: default_enabled(),
            target_language: default_target_language(),
        }
    }
}
