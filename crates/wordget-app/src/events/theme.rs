use std::sync::Arc;

use wordget_core::theme::analyze_theme;
use wordget_types::{TabHandle, UiEvent};

use crate::state::AppState;

/// Sample the page's colors and adopt the derived theme, unless sampling
/// outlasts the theme timeout. A theme already sampled from the tab's current
/// page is reused without sampling.
pub async fn detect_theme(state: Arc<AppState>, tab: TabHandle) {
    let cached = state
        .sessions
        .lock()
        .await
        .get(&tab.id)
        .and_then(|session| session.theme_for(&tab.url).cloned());
    if let Some(theme) = cached {
        tracing::debug!("Reusing cached theme for tab {}", tab.id);
        state.broadcast(UiEvent::ApplyTheme { theme });
        return;
    }

    let limit = state.config.capture.theme_timeout();
    let bridge = state.acquirer.bridge().clone();
    let target = tab.clone();
    // a late sample finishes in the background and is dropped
    let mut sampling = tokio::spawn(async move { bridge.sample_colors(&target).await });

    let theme = match tokio::time::timeout(limit, &mut sampling).await {
        Ok(Ok(Ok(sample))) => analyze_theme(&sample),
        Ok(Ok(Err(e))) => {
            tracing::warn!("Theme sampling failed on tab {}: {}", tab.id, e);
            return;
        }
        Ok(Err(e)) => {
            tracing::error!("Theme sampling task failed on tab {}: {}", tab.id, e);
            return;
        }
        Err(_) => {
            tracing::debug!("Theme detection on tab {} timed out after {:?}", tab.id, limit);
            return;
        }
    };

    tracing::debug!("Tab {} theme: dark={} primary={}", tab.id, theme.is_dark, theme.primary);

    state
        .sessions
        .lock()
        .await
        .entry(tab.id)
        .or_default()
        .cache_theme(&tab.url, theme.clone());

    if let Err(e) = state.settings.save_theme(&theme).await {
        tracing::warn!("Failed to persist theme: {}", e);
    }

    state.broadcast(UiEvent::ApplyTheme { theme });
}
