use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use tokio::time::timeout;
use wordget_capture::{BridgeError, PageAgent, PageBridge};
use wordget_config::Config;
use wordget_config::capture::CaptureConfig;
use wordget_config::translator::TranslatorConfig;
use wordget_core::{Document, SelectionRange};
use wordget_store::MemoryStore;
use wordget_translator::{ProviderMetadata, TranslateError, Translator};
use wordget_types::{
    ColorSample, FrameSnapshot, PageReply, PageRequest, TabHandle, TabId, UiEvent,
};

use crate::platform::{Platform, PlatformError};
use crate::state::AppState;

pub const WAIT: Duration = Duration::from_secs(2);

/// Page whose resident agent may or may not be listening
pub struct MockBridge {
    pub agent: Mutex<Option<PageAgent>>,
    pub frames: Vec<FrameSnapshot>,
    pub colors: ColorSample,
    pub color_delay: Duration,
    /// Samplings that ran to completion
    pub colors_sampled: AtomicUsize,
    pub messages: Mutex<Vec<PageRequest>>,
}

impl MockBridge {
    pub fn new(agent: Option<PageAgent>) -> Self {
        Self {
            agent: Mutex::new(agent),
            frames: Vec::new(),
            colors: ColorSample::default(),
            color_delay: Duration::ZERO,
            colors_sampled: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Agent with `selected` chosen inside `paragraph`
    pub fn with_selection(paragraph: &str, selected: &str) -> Self {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p");
        let text = doc.append_text(p, paragraph);

        let mut agent = PageAgent::new(doc, "https://example.com/article", "Article");
        agent.select(SelectionRange::new(text), selected);
        Self::new(Some(agent))
    }

    pub fn samples(&self) -> usize {
        self.colors_sampled.load(Ordering::SeqCst)
    }

    pub fn translate_mode(&self) -> Option<bool> {
        self.agent
            .lock()
            .unwrap()
            .as_ref()
            .map(|agent| agent.translate_mode())
    }
}

#[async_trait]
impl PageBridge for MockBridge {
    async fn send_message(
        &self,
        tab: &TabHandle,
        request: PageRequest,
    ) -> Result<PageReply, BridgeError> {
        self.messages.lock().unwrap().push(request.clone());
        match self.agent.lock().unwrap().as_mut() {
            Some(agent) => Ok(agent.handle(request)),
            None => Err(BridgeError::NoReceiver(tab.id)),
        }
    }

    async fn inject_agent(&self, _tab: &TabHandle) -> Result<(), BridgeError> {
        Err(BridgeError::Script("injection blocked".to_string()))
    }

    async fn frame_snapshots(&self, _tab: &TabHandle) -> Result<Vec<FrameSnapshot>, BridgeError> {
        Ok(self.frames.clone())
    }

    async fn sample_colors(&self, _tab: &TabHandle) -> Result<ColorSample, BridgeError> {
        tokio::time::sleep(self.color_delay).await;
        self.colors_sampled.fetch_add(1, Ordering::SeqCst);
        Ok(self.colors.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    OpenSidePanel(i64),
    SetBadge(TabId, String),
    ClearBadge(TabId),
}

#[derive(Default)]
pub struct MockPlatform {
    pub calls: Mutex<Vec<PlatformCall>>,
}

impl MockPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Poll until `calls` has at least `count` entries
    pub async fn wait_for_calls(&self, count: usize) -> Vec<PlatformCall> {
        let result = timeout(WAIT, async {
            loop {
                let calls = self.calls();
                if calls.len() >= count {
                    return calls;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;

        match result {
            Ok(calls) => calls,
            Err(_) => panic!("Timeout waiting for {} platform calls, got {:?}", count, self.calls()),
        }
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn open_side_panel(&self, window_id: i64) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(PlatformCall::OpenSidePanel(window_id));
        Ok(())
    }

    async fn set_badge(&self, tab_id: TabId, text: &str) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(PlatformCall::SetBadge(tab_id, text.to_string()));
        Ok(())
    }

    async fn clear_badge(&self, tab_id: TabId) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(PlatformCall::ClearBadge(tab_id));
        Ok(())
    }
}

/// Prefixes the target language, or fails every call
#[derive(Default)]
pub struct MockTranslator {
    pub fail: bool,
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, to: &str, _from: &str) -> Result<String, TranslateError> {
        if self.fail {
            return Err(TranslateError::ApiError("offline".to_string()));
        }
        Ok(format!("{to}:{text}"))
    }

    async fn detect_language(&self, text: &str) -> Result<String, TranslateError> {
        if self.fail {
            return Err(TranslateError::ApiError("offline".to_string()));
        }
        Ok(if text.is_ascii() { "en" } else { "zh-CN" }.to_string())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "mock".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

pub struct Fixture {
    pub state: Arc<AppState>,
    pub ui_rx: AsyncReceiver<UiEvent>,
    pub bridge: Arc<MockBridge>,
    pub platform: Arc<MockPlatform>,
}

pub fn test_config() -> Config {
    Config {
        translator: TranslatorConfig {
            backoff_ms: 0,
            ..TranslatorConfig::default()
        },
        capture: CaptureConfig {
            settle_delay_ms: 0,
            acquire_budget_ms: 300,
            badge_duration_ms: 20,
            theme_timeout_ms: 200,
            tooltip_debounce_ms: 20,
        },
        data_dir: std::env::temp_dir(),
        ui_channel_capacity: 64,
    }
}

pub fn fixture(bridge: MockBridge, translator: MockTranslator) -> Fixture {
    let (ui_tx, ui_rx) = kanal::bounded_async(64);
    let bridge = Arc::new(bridge);
    let platform = Arc::new(MockPlatform::default());

    let state = Arc::new(AppState::new(
        test_config(),
        Arc::new(MemoryStore::new()),
        bridge.clone(),
        Arc::new(translator),
        platform.clone(),
        ui_tx,
    ));

    Fixture {
        state,
        ui_rx,
        bridge,
        platform,
    }
}

pub fn tab(url: &str) -> TabHandle {
    TabHandle {
        id: 11,
        window_id: 3,
        url: url.to_string(),
        title: "Article".to_string(),
    }
}

pub async fn next_event(rx: &AsyncReceiver<UiEvent>) -> UiEvent {
    match timeout(WAIT, rx.recv()).await {
        Ok(Ok(event)) => event,
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - event never arrived!"),
    }
}

/// Receive until `matches` accepts an event
pub async fn wait_for_event(
    rx: &AsyncReceiver<UiEvent>,
    matches: impl Fn(&UiEvent) -> bool,
) -> UiEvent {
    loop {
        let event = next_event(rx).await;
        if matches(&event) {
            return event;
        }
    }
}

/// Nothing arrives within `within`
pub async fn assert_quiet(rx: &AsyncReceiver<UiEvent>, within: Duration) {
    if let Ok(Ok(event)) = timeout(within, rx.recv()).await {
        panic!("Unexpected event: {event:?}");
    }
}
