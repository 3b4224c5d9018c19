use std::sync::Arc;
use std::time::Duration;

use wordget_config::translator::TranslatorConfig;

use crate::{AUTO, LanguageCode, TranslateError, Translator};

/// Reported when detection fails
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Word and sentence translations for one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAndSentence {
    pub word_translation: String,
    pub sentence_translation: String,
}

/// Retry and fan-out on top of a `Translator`
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    max_retries: u32,
    backoff: Duration,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, max_retries: u32, backoff: Duration) -> Self {
        Self {
            translator,
            max_retries,
            backoff,
        }
    }

    pub fn from_config(translator: Arc<dyn Translator>, config: &TranslatorConfig) -> Self {
        Self::new(translator, config.max_retries, config.backoff())
    }

    pub async fn translate(&self, text: &str, to: &str) -> Result<String, TranslateError> {
        self.translator.translate(text, to, AUTO).await
    }

    /// Up to `max_retries + 1` attempts, sleeping `backoff * attempt` between them
    pub async fn translate_with_retry(
        &self,
        text: &str,
        to: &str,
        max_retries: u32,
    ) -> Result<String, TranslateError> {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff * attempt).await;
            }

            match self.translate(text, to).await {
                Ok(translation) => return Ok(translation),
                Err(e) => {
                    tracing::warn!("Translation attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TranslateError::ApiError("Translation failed".to_string())))
    }

    /// Both translations run concurrently; each falls back to its own source
    /// text on failure
    pub async fn translate_word_and_sentence(
        &self,
        word: &str,
        sentence: &str,
        to: &str,
    ) -> WordAndSentence {
        let word_task = self.translate_with_retry(word, to, self.max_retries);
        let sentence_task = async {
            if sentence.trim().is_empty() {
                Ok(String::new())
            } else {
                self.translate_with_retry(sentence, to, self.max_retries)
                    .await
            }
        };

        let (word_result, sentence_result) = tokio::join!(word_task, sentence_task);

        WordAndSentence {
            word_translation: word_result.unwrap_or_else(|e| {
                tracing::error!("Word translation failed, keeping original: {}", e);
                word.to_string()
            }),
            sentence_translation: sentence_result.unwrap_or_else(|e| {
                tracing::error!("Sentence translation failed, keeping original: {}", e);
                sentence.to_string()
            }),
        }
    }

    /// Detected source language, `unknown` when the provider cannot tell
    pub async fn detect_language(&self, text: &str) -> LanguageCode {
        if text.trim().is_empty() {
            return UNKNOWN_LANGUAGE.to_string();
        }

        self.translator
            .detect_language(text)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Language detection failed: {}", e);
                UNKNOWN_LANGUAGE.to_string()
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ProviderMetadata;

    /// Fails the first `failures[text]` calls for `text`, then succeeds
    #[derive(Default)]
    struct ScriptedTranslator {
        failures: Mutex<HashMap<String, u32>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTranslator {
        fn failing(text: &str, times: u32) -> Self {
            let translator = Self::default();
            translator
                .failures
                .lock()
                .unwrap()
                .insert(text.to_string(), times);
            translator
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for ScriptedTranslator {
        async fn translate(
            &self,
            text: &str,
            to: &str,
            _from: &str,
        ) -> Result<String, TranslateError> {
            let attempt = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(text.to_string());
                calls.iter().filter(|t| *t == text).count() as u32
            };

            let failures = self.failures.lock().unwrap().get(text).copied().unwrap_or(0);
            if attempt <= failures {
                return Err(TranslateError::ApiError(format!("attempt {attempt}")));
            }
            Ok(format!("[{to}] {text}"))
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "scripted".to_string(),
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    fn service(translator: Arc<ScriptedTranslator>) -> TranslationService {
        TranslationService::new(translator, 2, Duration::ZERO)
    }

    #[tokio::test]
    async fn word_failure_does_not_block_sentence() {
        let translator = Arc::new(ScriptedTranslator::failing("serendipity", u32::MAX));

        let result = service(translator.clone())
            .translate_word_and_sentence("serendipity", "Pure serendipity.", "zh-CN")
            .await;

        assert_eq!(result.word_translation, "serendipity");
        assert_eq!(result.sentence_translation, "[zh-CN] Pure serendipity.");
        let word_calls = translator
            .calls()
            .iter()
            .filter(|t| *t == "serendipity")
            .count();
        assert_eq!(word_calls, 3);
    }

    #[tokio::test]
    async fn retry_recovers_after_transient_failures() {
        let translator = Arc::new(ScriptedTranslator::failing("flaky", 2));

        let result = service(translator.clone())
            .translate_with_retry("flaky", "ja", 2)
            .await
            .unwrap();

        assert_eq!(result, "[ja] flaky");
        assert_eq!(translator.calls().len(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let translator = Arc::new(ScriptedTranslator::failing("down", u32::MAX));

        let error = service(translator.clone())
            .translate_with_retry("down", "ja", 1)
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "API error: attempt 2");
        assert_eq!(translator.calls().len(), 2);
    }

    #[tokio::test]
    async fn empty_sentence_is_not_sent() {
        let translator = Arc::new(ScriptedTranslator::default());

        let result = service(translator.clone())
            .translate_word_and_sentence("word", "  ", "de")
            .await;

        assert_eq!(result.word_translation, "[de] word");
        assert_eq!(result.sentence_translation, "");
        assert_eq!(translator.calls(), vec!["word".to_string()]);
    }

    #[tokio::test]
    async fn undetectable_language_reads_unknown() {
        let service = service(Arc::new(ScriptedTranslator::default()));

        assert_eq!(service.detect_language("bonjour").await, UNKNOWN_LANGUAGE);
        assert_eq!(service.detect_language("  ").await, UNKNOWN_LANGUAGE);
    }
}
