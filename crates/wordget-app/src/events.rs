use std::sync::Arc;

use wordget_types::{PageRequest, Request, Response, TabHandle, TabId, Trigger};

use crate::state::AppState;

pub mod capture;
pub mod theme;
pub mod translate;

use capture::{capture_selection, show_warning_badge};
use translate::{schedule_tooltip, translate_text};

/// Platform trigger entry point. Failures are logged, never propagated to the page.
pub async fn handle_trigger(state: Arc<AppState>, trigger: Trigger, tab: TabHandle) {
    tracing::debug!("Trigger {:?} on tab {} ({})", trigger, tab.id, tab.url);

    let result = match trigger {
        Trigger::Shortcut => capture_selection(&state, &tab, None, true, true).await,
        Trigger::ContextMenu { selection_text } => {
            capture_selection(&state, &tab, Some(selection_text), true, true).await
        }
        Trigger::IconClick => {
            if let Err(e) = state.platform.open_side_panel(tab.window_id).await {
                tracing::warn!("Failed to open side panel: {}", e);
            }
            capture_selection(&state, &tab, None, false, false).await
        }
    };

    if let Err(e) = result {
        tracing::error!("Capture on tab {} failed: {}", tab.id, e);
        show_warning_badge(&state, tab.id);
    }
}

/// UI request dispatch. Every request gets a response; storage failures
/// become `{success: false, error}`.
pub async fn handle_request(state: Arc<AppState>, request: Request) -> Response {
    match request {
        Request::SaveWord { data } => match state.words.save(data).await {
            Ok(word) => Response::Saved {
                success: true,
                word,
            },
            Err(e) => {
                tracing::error!("Failed to save word: {}", e);
                Response::failed(e.to_string())
            }
        },
        Request::GetWords => Response::Words {
            words: state.words.get_all().await,
        },
        Request::SearchWords { query, filter } => Response::Words {
            words: state.words.search(&query, filter).await,
        },
        Request::UpdateWord { word_id, updates } => {
            match state.words.update(&word_id, updates).await {
                Ok(Some(_)) => Response::ok(),
                Ok(None) => Response::failed("Word not found"),
                Err(e) => Response::failed(e.to_string()),
            }
        }
        Request::DeleteWord { word_id } => match state.words.delete(&word_id).await {
            // deleting a missing id is not an error
            Ok(_) => Response::ok(),
            Err(e) => Response::failed(e.to_string()),
        },
        Request::DeleteWords { word_ids } => match state.words.delete_many(&word_ids).await {
            Ok(count) => Response::Count {
                success: true,
                count,
            },
            Err(e) => Response::failed(e.to_string()),
        },
        Request::ClearWords => match state.words.clear().await {
            Ok(()) => Response::ok(),
            Err(e) => Response::failed(e.to_string()),
        },
        Request::ExportWords => match state.words.export().await {
            Ok(data) => Response::Exported { data },
            Err(e) => Response::failed(e.to_string()),
        },
        Request::ImportWords { data } => match state.words.import(&data).await {
            Ok(count) => Response::Count {
                success: true,
                count,
            },
            Err(e) => {
                tracing::warn!("Import rejected: {}", e);
                Response::failed(e.to_string())
            }
        },
        Request::Translate { text, target_lang } => {
            let target = match target_lang {
                Some(lang) if !lang.trim().is_empty() => lang,
                _ => state.settings.get().await.target_language,
            };
            Response::Translation {
                translation: translate_text(&state, &text, &target).await,
            }
        }
        Request::DetectLanguage { text } => Response::Language {
            language: state.translation.detect_language(&text).await,
        },
        Request::GetSettings => Response::Settings {
            settings: state.settings.get().await,
        },
        Request::SaveSettings { settings } => match state.settings.save(&settings).await {
            Ok(()) => Response::ok(),
            Err(e) => Response::failed(e.to_string()),
        },
        Request::GetTheme { tab_id } => {
            let cached = match tab_id {
                Some(id) => state
                    .sessions
                    .lock()
                    .await
                    .get(&id)
                    .and_then(|session| session.theme.clone()),
                None => None,
            };
            let theme = match cached {
                Some(theme) => Some(theme),
                None => state.settings.load_theme().await,
            };
            Response::Theme { theme }
        }
        Request::ToggleTranslateMode {
            tab_id,
            active,
            reason,
        } => toggle_translate_mode(&state, tab_id, active, reason).await,
        Request::SelectionChanged {
            tab_id,
            text,
            sentence,
        } => {
            schedule_tooltip(&state, tab_id, text, sentence).await;
            Response::ok()
        }
        Request::TabClosed { tab_id } => {
            if state.sessions.lock().await.remove(&tab_id).is_some() {
                tracing::debug!("Dropped session for tab {}", tab_id);
            }
            Response::ok()
        }
    }
}

async fn toggle_translate_mode(
    state: &Arc<AppState>,
    tab_id: TabId,
    active: bool,
    reason: String,
) -> Response {
    {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.entry(tab_id).or_default();
        session.translate_mode = active;
        if !active {
            session.tooltip.cancel();
        }
    }
    tracing::info!("Translate mode {} on tab {} ({})", active, tab_id, reason);

    // the page agent mirrors the flag; a tab without one still toggles here
    let tab = TabHandle {
        id: tab_id,
        ..TabHandle::default()
    };
    if let Err(e) = state
        .acquirer
        .bridge()
        .send_message(&tab, PageRequest::ToggleTranslateMode { active, reason })
        .await
    {
        tracing::debug!("Page agent in tab {} not notified: {}", tab_id, e);
    }

    Response::ok()
}
