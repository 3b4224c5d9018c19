use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use wordget_core::preprocess::dedup_key;
use wordget_types::{ReviewFilter, WordCandidate, WordEntry, WordUpdate};

use crate::{KeyValueStore, StoreError, now_millis};

pub const WORDS_KEY: &str = "words";

type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// CRUD and merge-on-save over the persisted word collection.
///
/// Each mutation reads the whole collection, changes it and writes it back.
/// Calls are not serialized against each other; callers that may race must
/// await one mutation before issuing the next.
#[derive(Clone)]
pub struct WordStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl WordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            clock: Arc::new(now_millis),
        }
    }

    /// Replace the millisecond clock used for ids and timestamps
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Insert a new entry at the front, or merge into the entry with the same
    /// case-insensitive text
    pub async fn save(&self, candidate: WordCandidate) -> Result<WordEntry, StoreError> {
        let text = candidate.text.trim().to_string();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }

        let now = (self.clock)();
        let mut words = self.load().await?;
        let key = dedup_key(&text);

        if let Some(existing) = words.iter_mut().find(|w| dedup_key(&w.text) == key) {
            tracing::info!("Updating existing word '{}' ({})", existing.text, existing.id);
            merge_capture(existing, candidate, now);
            let merged = existing.clone();
            self.persist(&words).await?;
            return Ok(merged);
        }

        let entry = WordEntry {
            id: unique_id(&words, now),
            text,
            sentence: candidate.sentence.unwrap_or_default(),
            url: candidate.url.unwrap_or_default(),
            page_title: candidate.page_title.unwrap_or_default(),
            timestamp: now,
            translation: candidate.translation.unwrap_or_default(),
            sentence_translation: candidate.sentence_translation.unwrap_or_default(),
            notes: String::new(),
            reviewed: false,
        };

        tracing::info!("Adding new word '{}' ({})", entry.text, entry.id);
        words.insert(0, entry.clone());
        self.persist(&words).await?;
        tracing::debug!("Collection now holds {} words", words.len());

        Ok(entry)
    }

    /// The ordered collection; unreadable storage reads as empty
    pub async fn get_all(&self) -> Vec<WordEntry> {
        self.load().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read word list, treating as empty: {}", e);
            Vec::new()
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Option<WordEntry> {
        self.get_all().await.into_iter().find(|w| w.id == id)
    }

    /// Entries passing `filter` whose text, translation or sentence contains
    /// `query`, ignoring case. A blank query matches everything.
    pub async fn search(&self, query: &str, filter: ReviewFilter) -> Vec<WordEntry> {
        let query = query.trim().to_lowercase();

        self.get_all()
            .await
            .into_iter()
            .filter(|w| filter.accepts(w.reviewed))
            .filter(|w| {
                query.is_empty()
                    || [&w.text, &w.translation, &w.sentence]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// `Ok(None)` when no entry has `id`
    pub async fn update(
        &self,
        id: &str,
        updates: WordUpdate,
    ) -> Result<Option<WordEntry>, StoreError> {
        let mut words = self.load().await?;

        let Some(entry) = words.iter_mut().find(|w| w.id == id) else {
            tracing::warn!("Word to update not found: {}", id);
            return Ok(None);
        };

        apply_update(entry, updates);
        let updated = entry.clone();
        self.persist(&words).await?;
        tracing::debug!("Updated word {}", id);

        Ok(Some(updated))
    }

    /// Whether an entry was removed
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut words = self.load().await?;
        let before = words.len();
        words.retain(|w| w.id != id);

        if words.len() == before {
            tracing::warn!("Word to delete not found: {}", id);
            return Ok(false);
        }

        self.persist(&words).await?;
        tracing::info!("Deleted word {}", id);
        Ok(true)
    }

    /// Number of entries removed
    pub async fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError> {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut words = self.load().await?;
        let before = words.len();
        words.retain(|w| !ids.contains(w.id.as_str()));

        let removed = before - words.len();
        self.persist(&words).await?;
        tracing::info!("Deleted {} words", removed);
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.persist(&[]).await?;
        tracing::info!("Cleared all words");
        Ok(())
    }

    /// Pretty JSON array of the whole collection
    pub async fn export(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.get_all().await)?)
    }

    /// Merge an exported array into the collection, imported entries winning
    /// on text conflicts. Returns how many entries were imported.
    pub async fn import(&self, data: &str) -> Result<usize, StoreError> {
        let parsed: Value =
            serde_json::from_str(data).map_err(|e| StoreError::InvalidImport(e.to_string()))?;
        if !parsed.is_array() {
            return Err(StoreError::InvalidImport(
                "expected a JSON array of words".to_string(),
            ));
        }
        let incoming: Vec<WordEntry> =
            serde_json::from_value(parsed).map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let existing = self.load().await?;
        let now = (self.clock)();

        let mut keys = HashSet::new();
        let mut merged: Vec<WordEntry> = Vec::with_capacity(incoming.len() + existing.len());
        for mut entry in incoming {
            entry.text = entry.text.trim().to_string();
            if entry.text.is_empty() || !keys.insert(dedup_key(&entry.text)) {
                continue;
            }
            merged.push(entry);
        }
        let imported = merged.len();

        let kept: Vec<WordEntry> = existing
            .into_iter()
            .filter(|w| !keys.contains(&dedup_key(&w.text)))
            .collect();

        // Imported ids must not collide with kept entries or with each other
        let mut ids: HashSet<String> = kept.iter().map(|w| w.id.clone()).collect();
        for entry in merged.iter_mut() {
            if entry.id.trim().is_empty() || ids.contains(&entry.id) {
                let mut stamp = now;
                while ids.contains(&format!("word_{stamp}")) {
                    stamp += 1;
                }
                tracing::debug!("Imported '{}' gets id word_{}", entry.text, stamp);
                entry.id = format!("word_{stamp}");
            }
            ids.insert(entry.id.clone());
        }

        merged.extend(kept);

        self.persist(&merged).await?;
        tracing::info!(
            "Imported {} words, collection now holds {}",
            imported,
            merged.len()
        );
        Ok(imported)
    }

    async fn load(&self) -> Result<Vec<WordEntry>, StoreError> {
        match self.backend.get(WORDS_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    async fn persist(&self, words: &[WordEntry]) -> Result<(), StoreError> {
        self.backend
            .set(WORDS_KEY, serde_json::to_value(words)?)
            .await
    }
}

/// Re-capture of a known word: provenance and timestamp always move, captured
/// content only replaces what is there when it is non-empty
fn merge_capture(existing: &mut WordEntry, candidate: WordCandidate, now: u64) {
    if let Some(sentence) = non_empty(candidate.sentence) {
        existing.sentence = sentence;
    }
    if let Some(translation) = non_empty(candidate.translation) {
        existing.translation = translation;
    }
    if let Some(translation) = non_empty(candidate.sentence_translation) {
        existing.sentence_translation = translation;
    }
    existing.url = candidate.url.unwrap_or_default();
    existing.page_title = candidate.page_title.unwrap_or_default();
    existing.timestamp = now;
}

fn apply_update(entry: &mut WordEntry, updates: WordUpdate) {
    let WordUpdate {
        sentence,
        url,
        page_title,
        translation,
        sentence_translation,
        notes,
        reviewed,
    } = updates;

    if let Some(v) = sentence {
        entry.sentence = v;
    }
    if let Some(v) = url {
        entry.url = v;
    }
    if let Some(v) = page_title {
        entry.page_title = v;
    }
    if let Some(v) = translation {
        entry.translation = v;
    }
    if let Some(v) = sentence_translation {
        entry.sentence_translation = v;
    }
    if let Some(v) = notes {
        entry.notes = v;
    }
    if let Some(v) = reviewed {
        entry.reviewed = v;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `word_<now>`, bumped past ids already in the collection
fn unique_id(words: &[WordEntry], now: u64) -> String {
    let mut stamp = now;
    loop {
        let id = format!("word_{stamp}");
        if !words.iter().any(|w| w.id == id) {
            return id;
        }
        stamp += 1;
    }
}
