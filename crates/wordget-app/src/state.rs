use std::collections::HashMap;
use std::sync::Arc;

use kanal::AsyncSender;
use tokio::sync::Mutex;
use wordget_capture::{PageBridge, SelectionAcquirer};
use wordget_config::Config;
use wordget_store::{KeyValueStore, SettingsStore, WordStore};
use wordget_translator::{TranslationService, Translator};
use wordget_types::{TabId, UiEvent};

use crate::platform::Platform;
use crate::session::TabSession;

pub struct AppState {
    pub config: Config,
    pub words: WordStore,
    pub settings: SettingsStore,
    pub acquirer: SelectionAcquirer,
    pub translation: TranslationService,
    pub platform: Arc<dyn Platform>,
    pub sessions: Mutex<HashMap<TabId, TabSession>>,
    ui_tx: AsyncSender<UiEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn KeyValueStore>,
        bridge: Arc<dyn PageBridge>,
        translator: Arc<dyn Translator>,
        platform: Arc<dyn Platform>,
        ui_tx: AsyncSender<UiEvent>,
    ) -> Self {
        Self {
            words: WordStore::new(backend.clone()),
            settings: SettingsStore::new(backend),
            acquirer: SelectionAcquirer::from_config(bridge, &config.capture),
            translation: TranslationService::from_config(translator, &config.translator),
            platform,
            sessions: Mutex::new(HashMap::new()),
            ui_tx,
            config,
        }
    }

    /// Best effort: a full or closed UI channel drops the event
    pub fn broadcast(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("UI channel full, dropping event"),
            Err(e) => tracing::debug!("No UI listening: {}", e),
        }
    }
}
