mod acquirer;
mod agent;
mod bridge;
mod frame;

pub use acquirer::{
    DEFAULT_ACQUIRE_BUDGET, RESTRICTED_SCHEMES, SelectionAcquirer, Strategy, is_restricted_url,
};
pub use agent::PageAgent;
pub use bridge::{BridgeError, PageBridge};
pub use frame::extract_from_frame;
