use async_trait::async_trait;
use wordget_types::{ColorSample, FrameSnapshot, PageReply, PageRequest, TabHandle};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Tab {0} is unreachable")]
    Unreachable(i64),

    /// No agent listening in the page yet
    #[error("No receiving end in tab {0}")]
    NoReceiver(i64),

    #[error("Script failed: {0}")]
    Script(String),
}

/// Access to a browser tab's content. Every call may fail for reasons outside
/// our control (closed tab, navigation, restricted page).
#[async_trait]
pub trait PageBridge: Send + Sync {
    /// Message the agent resident in the tab's top frame
    async fn send_message(
        &self,
        tab: &TabHandle,
        request: PageRequest,
    ) -> Result<PageReply, BridgeError>;

    /// Inject the agent script and its stylesheet into the tab
    async fn inject_agent(&self, tab: &TabHandle) -> Result<(), BridgeError>;

    /// Run the frame extraction script in every frame, collecting raw selection state
    async fn frame_snapshots(&self, tab: &TabHandle) -> Result<Vec<FrameSnapshot>, BridgeError>;

    /// Computed colors of the page body and its leading elements
    async fn sample_colors(&self, tab: &TabHandle) -> Result<ColorSample, BridgeError>;
}
