use wordget_core::sentence::WINDOW_RADIUS;
use wordget_core::sentence_or_window;
use wordget_types::{FrameSnapshot, SelectionData};

/// Selection from one frame's snapshot, with the same sentence-then-window
/// reduction the page agent applies. `None` when the frame has no selection.
pub fn extract_from_frame(snapshot: &FrameSnapshot) -> Option<SelectionData> {
    let text = snapshot.selected_text.trim();
    if text.is_empty() {
        return None;
    }

    let sentence = sentence_or_window(&snapshot.context_text, text, WINDOW_RADIUS)
        .unwrap_or_else(|| text.to_string());

    Some(SelectionData {
        text: text.to_string(),
        sentence,
        url: snapshot.url.clone(),
        page_title: snapshot.title.clone(),
    })
}
