use std::time::Duration;

mod google;
mod service;

pub use google::{GoogleTranslator, ParsedTranslation, parse_response};
pub use service::{TranslationService, UNKNOWN_LANGUAGE, WordAndSentence};

pub type LanguageCode = String;

/// Source language value asking the provider to detect it
pub const AUTO: &str = "auto";

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `to`. Empty input yields an empty string without a request.
    async fn translate(&self, text: &str, to: &str, from: &str) -> Result<String, TranslateError>;

    /// Language the provider detects for `text`
    async fn detect_language(&self, _text: &str) -> Result<LanguageCode, TranslateError> {
        Err(TranslateError::ApiError(format!(
            "{} cannot detect languages",
            self.metadata().name
        )))
    }

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translation timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
