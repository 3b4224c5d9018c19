use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod settings;
pub mod translator;

pub use settings::Settings;

/// Process configuration, resolved from the environment at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub capture: CaptureConfig,

    /// Directory holding the persisted key-value document
    pub data_dir: PathBuf,
    /// Capacity of the coordinator -> UI broadcast channel
    pub ui_channel_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let data_dir = env::var("WORDGET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("wordget-data"));

        let ui_channel_capacity = env_or("UI_CHANNEL_CAPACITY", 256);

        Config {
            translator: TranslatorConfig::new(),
            capture: CaptureConfig::new(),

            data_dir,
            ui_channel_capacity,
        }
    }

    /// Path of the JSON document backing local storage
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an environment variable, falling back when it is unset or malformed
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
