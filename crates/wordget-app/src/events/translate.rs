use std::sync::Arc;

use wordget_types::{TabId, UiEvent, WordEntry, WordUpdate};

use crate::state::AppState;

/// Translate a saved word and its sentence, store the result and re-announce
/// the entry. Runs detached from the capture; failures only get logged.
pub async fn fill_translation(state: Arc<AppState>, word: WordEntry, target: String) {
    let result = state
        .translation
        .translate_word_and_sentence(&word.text, &word.sentence, &target)
        .await;

    let updates = WordUpdate {
        translation: Some(result.word_translation),
        sentence_translation: Some(result.sentence_translation),
        ..WordUpdate::default()
    };

    match state.words.update(&word.id, updates).await {
        Ok(Some(updated)) => {
            tracing::debug!("Stored translation for '{}'", updated.text);
            state.broadcast(UiEvent::WordSaved { word: updated });
        }
        Ok(None) => tracing::warn!("Word {} vanished before translation landed", word.id),
        Err(e) => tracing::error!("Failed to store translation for {}: {}", word.id, e),
    }
}

/// Single translation with retries; the source text comes back on failure
pub async fn translate_text(state: &AppState, text: &str, target: &str) -> String {
    let max_retries = state.config.translator.max_retries;
    match state
        .translation
        .translate_with_retry(text, target, max_retries)
        .await
    {
        Ok(translation) => translation,
        Err(e) => {
            tracing::warn!("Translation failed, returning source text: {}", e);
            text.to_string()
        }
    }
}

/// Debounced translate-on-selection for tabs in translate mode
pub async fn schedule_tooltip(state: &Arc<AppState>, tab_id: TabId, text: String, sentence: String) {
    let text = text.trim().to_string();
    let settings = state.settings.get().await;

    let mut sessions = state.sessions.lock().await;
    let Some(session) = sessions.get_mut(&tab_id) else {
        return;
    };

    if !session.translate_mode || !settings.show_translation_tooltip || text.is_empty() {
        session.tooltip.cancel();
        return;
    }

    let task_state = state.clone();
    let target = settings.target_language;
    session
        .tooltip
        .schedule(state.config.capture.tooltip_debounce(), async move {
            let result = task_state
                .translation
                .translate_word_and_sentence(&text, &sentence, &target)
                .await;

            task_state.broadcast(UiEvent::ShowTranslation {
                tab_id,
                word: text,
                word_translation: result.word_translation,
                sentence,
                sentence_translation: result.sentence_translation,
            });
        });
}
