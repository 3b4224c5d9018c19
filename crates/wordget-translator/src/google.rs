use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use wordget_config::translator::TranslatorConfig;

use crate::{AUTO, LanguageCode, ProviderMetadata, TranslateError, Translator};

/// Client for the public `translate_a/single` endpoint
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    fallback_source: LanguageCode,
}

/// Positional fields of a `translate_a/single` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTranslation {
    pub text: String,
    pub detected_source: Option<String>,
}

impl GoogleTranslator {
    pub fn new(endpoint: String, timeout: Duration, fallback_source: LanguageCode) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint,
            timeout,
            fallback_source,
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.timeout(),
            config.fallback_source.clone(),
        )
    }

    async fn request(
        &self,
        text: &str,
        to: &str,
        from: &str,
    ) -> Result<ParsedTranslation, TranslateError> {
        let exchange = async {
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("client", "gtx"),
                    ("sl", from),
                    ("tl", to),
                    ("dt", "t"),
                    ("q", text),
                ])
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                return Err(TranslateError::RateLimitExceeded);
            }

            if !response.status().is_success() {
                return Err(TranslateError::ApiError(format!(
                    "HTTP {}",
                    response.status()
                )));
            }

            let json: Value = response.json().await.map_err(|e| {
                TranslateError::ParseError(format!("Failed to parse response: {}", e))
            })?;

            parse_response(&json)
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TranslateError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, to: &str, from: &str) -> Result<String, TranslateError> {
        let original = text.trim();
        if original.is_empty() {
            return Ok(String::new());
        }

        let mut parsed = self.request(original, to, from).await?;

        // Auto-detection sometimes echoes the input back; force the fallback source once
        let echoed = parsed.text == original
            && parsed.detected_source.as_deref() != Some(self.fallback_source.as_str());
        if from == AUTO && (parsed.text.is_empty() || echoed) {
            tracing::debug!(
                "Retrying '{}' with source {} (detected {:?})",
                original,
                self.fallback_source,
                parsed.detected_source
            );
            let retried = self.request(original, to, &self.fallback_source).await?;
            if !retried.text.is_empty() {
                parsed = retried;
            }
        }

        if parsed.text.is_empty() {
            tracing::warn!("Empty translation for '{}', returning original", original);
            return Ok(original.to_string());
        }

        tracing::debug!("Translated '{}' -> '{}'", original, parsed.text);
        Ok(parsed.text)
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageCode, TranslateError> {
        let parsed = self.request(text.trim(), "en", AUTO).await?;
        parsed
            .detected_source
            .filter(|lang| !lang.is_empty())
            .ok_or_else(|| TranslateError::ParseError("No detected language".to_string()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Translate".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// `data[0]` is the fragment list (`fragment[0]` the translated piece),
/// `data[2]` the detected source language
pub fn parse_response(data: &Value) -> Result<ParsedTranslation, TranslateError> {
    let fragments = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::ParseError("No translation fragments".to_string()))?;

    let text: String = fragments
        .iter()
        .filter_map(|fragment| fragment.get(0)?.as_str())
        .filter(|piece| !piece.is_empty())
        .collect();

    Ok(ParsedTranslation {
        text: text.trim().to_string(),
        detected_source: data.get(2).and_then(Value::as_str).map(str::to_string),
    })
}
