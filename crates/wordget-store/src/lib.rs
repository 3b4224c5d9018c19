mod kv;
mod settings;
mod words;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use settings::{SETTINGS_KEY, SettingsStore, THEME_KEY};
pub use words::{WORDS_KEY, WordStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid import data: {0}")]
    InvalidImport(String),

    #[error("Word text is empty")]
    EmptyText,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
