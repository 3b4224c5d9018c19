use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::BufReader;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use wordget_config::Config;
use wordget_store::JsonFileStore;
use wordget_translator::{GoogleTranslator, Translator};
use wordget_types::UiEvent;

use crate::io::{CALL_TIMEOUT, HostRelay, Outbound, forward_events, read_loop, write_loop};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub ui: (AsyncSender<UiEvent>, AsyncReceiver<UiEvent>),
    pub outbound: (AsyncSender<Outbound>, AsyncReceiver<Outbound>),
}

impl ChannelSet {
    pub fn new(ui_capacity: usize) -> Self {
        Self {
            ui: kanal::bounded_async(ui_capacity),
            outbound: kanal::bounded_async(256),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    relay: Arc<HostRelay>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let channels = ChannelSet::new(config.ui_channel_capacity);
        let relay = Arc::new(HostRelay::new(channels.outbound.0.clone(), CALL_TIMEOUT));

        let backend = Arc::new(JsonFileStore::new(config.storage_path()));
        tracing::info!("Word storage at {}", backend.path().display());

        let translator = Arc::new(GoogleTranslator::from_config(&config.translator));
        let provider = translator.metadata();
        tracing::info!(
            "Translator: {} (api key required: {}, free tier: {})",
            provider.name,
            provider.requires_api_key,
            provider.free_tier_available
        );

        let state = Arc::new(AppState::new(
            config,
            backend,
            relay.clone(),
            translator,
            relay.clone(),
            channels.ui.0.clone(),
        ));

        if state.settings.initialize().await? {
            tracing::info!("First run, default settings stored");
        }

        Ok(Self {
            channels,
            state,
            relay,
            cancel_token: CancellationToken::new(),
        })
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // stdout writer
        tasks.spawn(write_loop(
            tokio::io::stdout(),
            self.channels.outbound.1.clone(),
            self.cancel_token.child_token(),
        ));

        // UI broadcasts
        tasks.spawn(forward_events(
            self.channels.ui.1.clone(),
            self.channels.outbound.0.clone(),
            self.cancel_token.child_token(),
        ));

        // stdin reader
        tasks.spawn(read_loop(
            BufReader::new(tokio::io::stdin()),
            self.state.clone(),
            self.relay.clone(),
            self.channels.outbound.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
