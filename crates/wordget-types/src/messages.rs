use serde::{Deserialize, Serialize};
use wordget_config::Settings;

use crate::types::{ReviewFilter, SelectionData, TabId, Theme, WordCandidate, WordEntry, WordUpdate};

/// UI surface -> coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    SaveWord {
        data: WordCandidate,
    },
    GetWords,
    /// Case-insensitive match on text, translation and sentence
    SearchWords {
        #[serde(default)]
        query: String,
        #[serde(default)]
        filter: ReviewFilter,
    },
    UpdateWord {
        word_id: String,
        updates: WordUpdate,
    },
    DeleteWord {
        word_id: String,
    },
    DeleteWords {
        word_ids: Vec<String>,
    },
    ClearWords,
    ExportWords,
    ImportWords {
        data: String,
    },
    Translate {
        text: String,
        #[serde(default)]
        target_lang: Option<String>,
    },
    DetectLanguage {
        text: String,
    },
    GetSettings,
    SaveSettings {
        settings: Settings,
    },
    /// The tab's cached theme when `tab_id` is given, else the last stored one
    GetTheme {
        #[serde(default)]
        tab_id: Option<TabId>,
    },
    ToggleTranslateMode {
        tab_id: TabId,
        active: bool,
        #[serde(default)]
        reason: String,
    },
    SelectionChanged {
        tab_id: TabId,
        text: String,
        #[serde(default)]
        sentence: String,
    },
    TabClosed {
        tab_id: TabId,
    },
}

/// Coordinator -> UI surface, reply to a `Request`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Saved {
        success: bool,
        word: WordEntry,
    },
    Words {
        words: Vec<WordEntry>,
    },
    Translation {
        translation: String,
    },
    Language {
        language: String,
    },
    Settings {
        settings: Settings,
    },
    Theme {
        theme: Option<Theme>,
    },
    Exported {
        data: String,
    },
    Count {
        success: bool,
        count: usize,
    },
    Ack {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ack {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Response::Ack {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Coordinator -> page-resident agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    GetSelection,
    ToggleTranslateMode {
        active: bool,
        #[serde(default)]
        reason: String,
    },
}

/// Page-resident agent -> coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageReply {
    /// `{text: ''}` when nothing is selected
    Selection(SelectionData),
    Ack { success: bool },
}

/// Coordinator -> UI broadcasts. Nobody may be listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    ShowWord {
        data: WordEntry,
    },
    WordSaved {
        word: WordEntry,
    },
    ApplyTheme {
        theme: Theme,
    },
    ShowTranslation {
        tab_id: TabId,
        word: String,
        word_translation: String,
        sentence: String,
        sentence_translation: String,
    },
}

/// Platform events that start a capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Trigger {
    /// Keyboard shortcut
    Shortcut,
    ContextMenu { selection_text: String },
    /// Toolbar icon
    IconClick,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn update_word_request_uses_extension_field_names() {
        let request: Request = serde_json::from_value(json!({
            "action": "updateWord",
            "wordId": "word_1",
            "updates": { "reviewed": true, "notes": "fruit" }
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::UpdateWord {
                word_id: "word_1".to_string(),
                updates: WordUpdate {
                    reviewed: Some(true),
                    notes: Some("fruit".to_string()),
                    ..WordUpdate::default()
                },
            }
        );
    }

    #[test]
    fn translate_request_target_is_optional() {
        let request: Request =
            serde_json::from_value(json!({ "action": "translate", "text": "hello" })).unwrap();

        assert_eq!(
            request,
            Request::Translate {
                text: "hello".to_string(),
                target_lang: None,
            }
        );
    }

    #[test]
    fn search_and_theme_requests_default_their_fields() {
        let request: Request = serde_json::from_value(json!({
            "action": "searchWords",
            "query": "Apple",
            "filter": "unreviewed"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::SearchWords {
                query: "Apple".to_string(),
                filter: ReviewFilter::Unreviewed,
            }
        );

        let request: Request = serde_json::from_value(json!({ "action": "searchWords" })).unwrap();
        assert_eq!(
            request,
            Request::SearchWords {
                query: String::new(),
                filter: ReviewFilter::All,
            }
        );

        let request: Request = serde_json::from_value(json!({ "action": "getTheme" })).unwrap();
        assert_eq!(request, Request::GetTheme { tab_id: None });

        let request: Request =
            serde_json::from_value(json!({ "action": "getTheme", "tabId": 4 })).unwrap();
        assert_eq!(request, Request::GetTheme { tab_id: Some(4) });
    }

    #[test]
    fn failed_ack_carries_error() {
        let value = serde_json::to_value(Response::failed("Word not found")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "Word not found" }));

        let value = serde_json::to_value(Response::ok()).unwrap();
        assert_eq!(value, json!({ "success": true }));
    }

    #[test]
    fn empty_page_reply_parses_as_selection() {
        let reply: PageReply = serde_json::from_value(json!({ "text": "" })).unwrap();
        match reply {
            PageReply::Selection(selection) => assert!(!selection.has_text()),
            other => panic!("unexpected reply: {other:?}"),
        }

        let reply: PageReply = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(reply, PageReply::Ack { success: true });
    }

    #[test]
    fn broadcast_is_tagged_by_action() {
        let value = serde_json::to_value(UiEvent::ApplyTheme {
            theme: Theme {
                is_dark: true,
                primary: "#8b9dc3".to_string(),
                secondary: "#9d7cb8".to_string(),
                accent: "#68d391".to_string(),
            },
        })
        .unwrap();

        assert_eq!(value["action"], "applyTheme");
        assert_eq!(value["theme"]["isDark"], true);
    }
}
