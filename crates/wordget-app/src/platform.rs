use async_trait::async_trait;
use wordget_types::TabId;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform call timed out")]
    Timeout,

    #[error("Platform call failed: {0}")]
    Failed(String),

    #[error("Platform connection closed")]
    Closed,
}

/// Browser chrome the coordinator drives but does not render
#[async_trait]
pub trait Platform: Send + Sync {
    async fn open_side_panel(&self, window_id: i64) -> Result<(), PlatformError>;

    async fn set_badge(&self, tab_id: TabId, text: &str) -> Result<(), PlatformError>;

    async fn clear_badge(&self, tab_id: TabId) -> Result<(), PlatformError>;
}
