use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_fallback_source() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Upper bound for one request/response exchange
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff step between retries
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Source language forced when auto-detection echoes the input back
    #[serde(default = "default_fallback_source")]
    pub fallback_source: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            endpoint: env::var("TRANSLATE_ENDPOINT").unwrap_or_else(|_| default_endpoint()),
            timeout_ms: env_or("TRANSLATE_TIMEOUT_MS", default_timeout_ms()),
            max_retries: env_or("TRANSLATE_MAX_RETRIES", default_max_retries()),
            backoff_ms: env_or("TRANSLATE_BACKOFF_MS", default_backoff_ms()),
            fallback_source: default_fallback_source(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            fallback_source: default_fallback_source(),
        }
    }
}
