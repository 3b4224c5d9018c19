use std::sync::Arc;

use wordget_types::{SelectionData, TabHandle, TabId, UiEvent, WordEntry};

use super::theme::detect_theme;
use super::translate::fill_translation;
use crate::state::AppState;

pub const WARNING_BADGE: &str = "!";

/// Acquire the tab's selection and save it.
///
/// `fallback_text` is the selection the platform reported with the trigger,
/// used when no strategy can read the page. Returns `Ok(None)` when there was
/// nothing to capture.
pub async fn capture_selection(
    state: &Arc<AppState>,
    tab: &TabHandle,
    fallback_text: Option<String>,
    open_panel: bool,
    warn_on_empty: bool,
) -> anyhow::Result<Option<WordEntry>> {
    let settings = state.settings.get().await;

    let selection = match state.acquirer.get_selection_data(tab).await {
        Some(data) => Some(data),
        None => fallback_text
            .filter(|text| !text.trim().is_empty())
            .map(|text| {
                tracing::debug!("Using trigger-provided selection for tab {}", tab.id);
                SelectionData {
                    text: text.trim().to_string(),
                    sentence: String::new(),
                    url: tab.url.clone(),
                    page_title: tab.title.clone(),
                }
            }),
    };

    let Some(mut selection) = selection else {
        if warn_on_empty {
            show_warning_badge(state, tab.id);
        }
        return Ok(None);
    };

    if !settings.capture_context {
        selection.sentence.clear();
    }

    let word = state.words.save(selection.into()).await?;
    tracing::info!("Captured '{}' from tab {}", word.text, tab.id);

    if open_panel
        && settings.auto_open_sidebar
        && let Err(e) = state.platform.open_side_panel(tab.window_id).await
    {
        tracing::warn!("Failed to open side panel: {}", e);
    }

    state.broadcast(UiEvent::ShowWord { data: word.clone() });
    state.broadcast(UiEvent::WordSaved { word: word.clone() });

    tokio::spawn(fill_translation(
        state.clone(),
        word.clone(),
        settings.target_language.clone(),
    ));

    if settings.adaptive_theme {
        tokio::spawn(detect_theme(state.clone(), tab.clone()));
    }

    Ok(Some(word))
}

/// Show the warning badge, clearing it after the configured duration
pub fn show_warning_badge(state: &Arc<AppState>, tab_id: TabId) {
    let state = state.clone();
    let duration = state.config.capture.badge_duration();

    tokio::spawn(async move {
        if let Err(e) = state.platform.set_badge(tab_id, WARNING_BADGE).await {
            tracing::warn!("Failed to set badge on tab {}: {}", tab_id, e);
            return;
        }

        tokio::time::sleep(duration).await;

        if let Err(e) = state.platform.clear_badge(tab_id).await {
            tracing::warn!("Failed to clear badge on tab {}: {}", tab_id, e);
        }
    });
}
