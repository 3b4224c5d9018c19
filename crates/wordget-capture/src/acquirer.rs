use std::sync::Arc;
use std::time::Duration;

use wordget_config::capture::CaptureConfig;
use wordget_types::{PageReply, PageRequest, SelectionData, TabHandle};

use crate::bridge::{BridgeError, PageBridge};
use crate::frame::extract_from_frame;

/// Pages no extension script may touch
pub const RESTRICTED_SCHEMES: &[&str] = &[
    "chrome:",
    "chrome-extension:",
    "chrome-search:",
    "chrome-untrusted:",
    "edge:",
    "about:",
    "devtools:",
    "view-source:",
    "moz-extension:",
    "brave:",
    "opera:",
    "vivaldi:",
];

/// Used when no budget is configured
pub const DEFAULT_ACQUIRE_BUDGET: Duration = Duration::from_secs(1);

pub fn is_restricted_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    RESTRICTED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

/// Ways of reading the selection, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Message the agent already living in the page
    ResidentAgent,
    /// Inject the agent, let it settle, message it again
    InjectAgent,
    /// Run the extraction script in every frame
    FrameScript,
}

impl Strategy {
    pub const CHAIN: [Strategy; 3] = [
        Strategy::ResidentAgent,
        Strategy::InjectAgent,
        Strategy::FrameScript,
    ];
}

/// Reads the user's selection from a tab, falling back through the strategy chain
#[derive(Clone)]
pub struct SelectionAcquirer {
    bridge: Arc<dyn PageBridge>,
    settle_delay: Duration,
    budget: Duration,
}

impl SelectionAcquirer {
    pub fn new(bridge: Arc<dyn PageBridge>, settle_delay: Duration) -> Self {
        Self {
            bridge,
            settle_delay,
            budget: DEFAULT_ACQUIRE_BUDGET,
        }
    }

    pub fn from_config(bridge: Arc<dyn PageBridge>, config: &CaptureConfig) -> Self {
        Self::new(bridge, config.settle_delay()).with_budget(config.acquire_budget())
    }

    /// Bound the whole chain; a call still in flight when it runs out is abandoned
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn bridge(&self) -> &Arc<dyn PageBridge> {
        &self.bridge
    }

    /// `None` when the page is restricted or no strategy found a selection.
    /// Bridge failures never escape; they move the chain along.
    pub async fn get_selection_data(&self, tab: &TabHandle) -> Option<SelectionData> {
        if is_restricted_url(&tab.url) {
            tracing::debug!("Tab {} is a restricted page: {}", tab.id, tab.url);
            return None;
        }

        match tokio::time::timeout(self.budget, self.run_chain(tab)).await {
            Ok(Some(data)) => Some(data),
            Ok(None) => {
                tracing::warn!("No selection found in tab {}", tab.id);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Selection in tab {} not read within {:?}",
                    tab.id,
                    self.budget
                );
                None
            }
        }
    }

    async fn run_chain(&self, tab: &TabHandle) -> Option<SelectionData> {
        for strategy in Strategy::CHAIN {
            match self.attempt(strategy, tab).await {
                Ok(Some(data)) => {
                    tracing::debug!("{:?} found selection in tab {}", strategy, tab.id);
                    return Some(data);
                }
                Ok(None) => {
                    tracing::debug!("{:?} found no selection in tab {}", strategy, tab.id);
                }
                Err(e) => {
                    tracing::debug!("{:?} failed in tab {}: {}", strategy, tab.id, e);
                }
            }
        }
        None
    }

    async fn attempt(
        &self,
        strategy: Strategy,
        tab: &TabHandle,
    ) -> Result<Option<SelectionData>, BridgeError> {
        match strategy {
            Strategy::ResidentAgent => self.ask_agent(tab).await,
            Strategy::InjectAgent => {
                self.bridge.inject_agent(tab).await?;
                tokio::time::sleep(self.settle_delay).await;
                self.ask_agent(tab).await
            }
            Strategy::FrameScript => {
                let snapshots = self.bridge.frame_snapshots(tab).await?;
                Ok(snapshots.iter().find_map(extract_from_frame))
            }
        }
    }

    async fn ask_agent(&self, tab: &TabHandle) -> Result<Option<SelectionData>, BridgeError> {
        match self.bridge.send_message(tab, PageRequest::GetSelection).await? {
            PageReply::Selection(data) if data.has_text() => Ok(Some(data)),
            _ => Ok(None),
        }
    }
}
