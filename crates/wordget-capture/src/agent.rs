use wordget_core::{Document, SelectionRange, SentenceExtractor};
use wordget_types::{PageReply, PageRequest, SelectionData};

/// Agent resident in a page: answers selection queries against the page's
/// document and tracks whether translate mode is on.
#[derive(Debug, Clone)]
pub struct PageAgent {
    document: Document,
    selection: Option<(SelectionRange, String)>,
    url: String,
    title: String,
    translate_mode: bool,
    extractor: SentenceExtractor,
}

impl PageAgent {
    pub fn new(document: Document, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            document,
            selection: None,
            url: url.into(),
            title: title.into(),
            translate_mode: false,
            extractor: SentenceExtractor::default(),
        }
    }

    pub fn select(&mut self, range: SelectionRange, text: impl Into<String>) {
        self.selection = Some((range, text.into()));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn translate_mode(&self) -> bool {
        self.translate_mode
    }

    pub fn handle(&mut self, request: PageRequest) -> PageReply {
        match request {
            PageRequest::GetSelection => PageReply::Selection(self.selection_data()),
            PageRequest::ToggleTranslateMode { active, reason } => {
                tracing::debug!("Translate mode {} ({})", active, reason);
                self.translate_mode = active;
                PageReply::Ack { success: true }
            }
        }
    }

    /// Current selection with its sentence; `text` is empty when nothing is selected
    pub fn selection_data(&self) -> SelectionData {
        let Some((range, raw)) = &self.selection else {
            return SelectionData::default();
        };

        let text = raw.trim();
        if text.is_empty() {
            return SelectionData::default();
        }

        SelectionData {
            text: text.to_string(),
            sentence: self.extractor.extract(&self.document, *range, raw),
            url: self.url.clone(),
            page_title: self.title.clone(),
        }
    }
}
