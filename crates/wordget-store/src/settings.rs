use std::sync::Arc;

use wordget_config::Settings;
use wordget_types::Theme;

use crate::{KeyValueStore, StoreError};

pub const SETTINGS_KEY: &str = "settings";
pub const THEME_KEY: &str = "currentTheme";

/// Settings record and the last detected theme
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Write default settings on first run. Returns whether anything was written.
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        if self.backend.get(SETTINGS_KEY).await?.is_some() {
            return Ok(false);
        }

        self.save(&Settings::default()).await?;
        tracing::info!("Initialized default settings");
        Ok(true)
    }

    /// Stored settings, or defaults when missing or unreadable
    pub async fn get(&self) -> Settings {
        match self.backend.get(SETTINGS_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Stored settings are malformed, using defaults: {}", e);
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("Failed to read settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        self.backend
            .set(SETTINGS_KEY, serde_json::to_value(settings)?)
            .await
    }

    pub async fn save_theme(&self, theme: &Theme) -> Result<(), StoreError> {
        self.backend
            .set(THEME_KEY, serde_json::to_value(theme)?)
            .await
    }

    pub async fn load_theme(&self) -> Option<Theme> {
        match self.backend.get(THEME_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read theme: {}", e);
                None
            }
        }
    }
}
