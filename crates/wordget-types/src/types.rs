use serde::{Deserialize, Serialize};

pub type TabId = i64;

/// A saved vocabulary item, serialized the way the extension stores it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// `word_<creation timestamp>`, never reassigned
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub page_title: String,
    /// Last write time, ms since epoch
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub sentence_translation: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reviewed: bool,
}

/// Review-state filter of the word list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    #[default]
    All,
    Reviewed,
    Unreviewed,
}

impl ReviewFilter {
    pub fn accepts(self, reviewed: bool) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Reviewed => reviewed,
            ReviewFilter::Unreviewed => !reviewed,
        }
    }
}

/// Fields offered to `WordStore::save`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCandidate {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_translation: Option<String>,
}

impl WordCandidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    pub fn with_source(mut self, url: impl Into<String>, page_title: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.page_title = Some(page_title.into());
        self
    }
}

impl From<SelectionData> for WordCandidate {
    fn from(selection: SelectionData) -> Self {
        Self {
            text: selection.text,
            sentence: Some(selection.sentence),
            url: Some(selection.url),
            page_title: Some(selection.page_title),
            translation: None,
            sentence_translation: None,
        }
    }
}

/// Partial patch applied by `WordStore::update`. `id` and `text` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed: Option<bool>,
}

/// Selection read from a page, with its context sentence and provenance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionData {
    pub text: String,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub page_title: String,
}

impl SelectionData {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Browser tab the coordinator is acting on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabHandle {
    pub id: TabId,
    #[serde(default)]
    pub window_id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Raw selection state read from one frame by the frame-scoped extraction script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    #[serde(default)]
    pub frame_id: u32,
    #[serde(default)]
    pub selected_text: String,
    /// Text content of the selection anchor's parent element
    #[serde(default)]
    pub context_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Adaptive color scheme derived from the page being read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub is_dark: bool,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// Computed colors sampled from a page's elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSample {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub body_bg: String,
    #[serde(default)]
    pub body_color: String,
}
