pub mod messages;
pub mod types;

pub use messages::{PageReply, PageRequest, Request, Response, Trigger, UiEvent};
pub use types::{
    ColorSample, FrameSnapshot, ReviewFilter, SelectionData, TabHandle, TabId, Theme, WordCandidate, WordEntry,
    WordUpdate,
};
