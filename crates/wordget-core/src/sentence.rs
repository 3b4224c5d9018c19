use crate::dom::{Document, NodeId, SelectionRange};
use crate::preprocess::collapse_whitespace;

/// Ancestor hops examined before giving up on a container
pub const MAX_ANCESTOR_HOPS: usize = 10;
/// Characters kept on each side of the selection by the window fallback
pub const WINDOW_RADIUS: usize = 100;
/// Longest sentence returned as-is; longer ones are windowed
pub const MAX_SENTENCE_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

/// Tags that can hold a readable sentence
pub const CONTAINER_TAGS: &[&str] = &[
    "p", "div", "li", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "code", "span", "article", "section", "dd", "dt", "figcaption", "label", "a", "em",
    "strong",
];

/// Reduces a selection to the sentence it was taken from
#[derive(Debug, Clone)]
pub struct SentenceExtractor {
    pub max_hops: usize,
    pub radius: usize,
}

impl Default for SentenceExtractor {
    fn default() -> Self {
        Self {
            max_hops: MAX_ANCESTOR_HOPS,
            radius: WINDOW_RADIUS,
        }
    }
}

impl SentenceExtractor {
    /// Never fails: anything that cannot be resolved yields the trimmed selection
    pub fn extract(&self, doc: &Document, range: SelectionRange, selected_text: &str) -> String {
        let selected = collapse_whitespace(selected_text);
        if selected.is_empty() {
            return String::new();
        }

        let Some(container) = self.find_container(doc, range.common_ancestor, &selected) else {
            tracing::debug!("No container longer than selection, using raw text");
            return selected_text.trim().to_string();
        };

        let text = doc.composed_text(container);
        sentence_or_window(&text, &selected, self.radius)
            .unwrap_or_else(|| selected_text.trim().to_string())
    }

    fn find_container(&self, doc: &Document, start: NodeId, selected: &str) -> Option<NodeId> {
        let selected_len = selected.chars().count();
        let mut current = doc.element_or_parent(start);

        for _ in 0..self.max_hops {
            let element = current?;
            let is_container = doc
                .tag(element)
                .is_some_and(|tag| CONTAINER_TAGS.contains(&tag));

            if is_container
                && collapse_whitespace(&doc.composed_text(element)).chars().count() > selected_len
            {
                return Some(element);
            }

            current = doc.parent_element(element);
        }

        None
    }
}

pub fn extract_sentence(doc: &Document, range: SelectionRange, selected_text: &str) -> String {
    SentenceExtractor::default().extract(doc, range, selected_text)
}

/// Sentence containing `selected`, or a character window around it.
///
/// Both inputs are whitespace-collapsed first. `None` when the selection does
/// not occur in `text`.
pub fn sentence_or_window(text: &str, selected: &str, radius: usize) -> Option<String> {
    let text = collapse_whitespace(text);
    let selected = collapse_whitespace(selected);
    if selected.is_empty() {
        return None;
    }

    let sentences = split_sentences(&text);
    let has_boundary = sentences.len() > 1 || sentences.first().is_some_and(|s| ends_sentence(s));

    if has_boundary
        && let Some(sentence) = sentences.iter().find(|s| s.contains(selected.as_str()))
    {
        if sentence.chars().count() <= MAX_SENTENCE_CHARS {
            return Some(sentence.to_string());
        }
        return window_around(sentence, &selected, radius);
    }

    window_around(&text, &selected, radius)
}

/// Split on `. ! ?` followed by whitespace or end of text, and on `。！？` anywhere.
/// Terminator runs and closing quotes stay with their sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        let mut end = i + c.len_utf8();
        let mut cjk = is_cjk_terminator(c);
        while let Some(&(j, next)) = chars.peek() {
            if is_terminator(next) {
                cjk |= is_cjk_terminator(next);
            } else if !is_closer(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }

        let at_boundary = cjk || chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if at_boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

/// `radius` characters either side of the first occurrence of `selected`,
/// with ellipsis markers on truncated ends
pub fn window_around(text: &str, selected: &str, radius: usize) -> Option<String> {
    let byte_index = text.find(selected)?;
    let sel_start = text[..byte_index].chars().count();
    let sel_len = selected.chars().count();
    let total = text.chars().count();

    let from = sel_start.saturating_sub(radius);
    let to = (sel_start + sel_len + radius).min(total);

    let body: String = text.chars().skip(from).take(to - from).collect();
    let mut snippet = String::with_capacity(body.len() + ELLIPSIS.len() * 2);
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(body.trim());
    if to < total {
        snippet.push_str(ELLIPSIS);
    }

    Some(snippet)
}

fn ends_sentence(sentence: &str) -> bool {
    sentence
        .trim_end_matches(is_closer)
        .chars()
        .next_back()
        .is_some_and(is_terminator)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?') || is_cjk_terminator(c)
}

fn is_cjk_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | '”' | '’' | '」' | '』' | '）')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), "body");
        let p = doc.append_element(body, "p");
        let node = doc.append_text(p, text);
        (doc, node)
    }

    #[test]
    fn returns_sentence_containing_selection() {
        let (doc, node) = paragraph("Cats are great. Dogs are great too.");
        let sentence = extract_sentence(&doc, SelectionRange::new(node), "Dogs");
        assert_eq!(sentence, "Dogs are great too.");
    }

    #[test]
    fn splits_on_cjk_punctuation() {
        let (doc, node) = paragraph("今天天气很好。我们去公园散步吧！好吗？");
        let sentence = extract_sentence(&doc, SelectionRange::new(node), "公园");
        assert_eq!(sentence, "我们去公园散步吧！");
    }

    #[test]
    fn decimal_point_is_not_a_boundary() {
        let sentences = split_sentences("Pi is 3.14 roughly. Next one?! \"Quoted.\" Tail");
        assert_eq!(
            sentences,
            vec!["Pi is 3.14 roughly.", "Next one?!", "\"Quoted.\"", "Tail"]
        );
    }

    #[test]
    fn unpunctuated_block_falls_back_to_window() {
        let block: String = (0..60).map(|i| format!("w{:03}", i)).collect::<Vec<_>>().join(" ");
        assert!(block.chars().count() >= 290);
        let (doc, node) = paragraph(&block);

        let sentence = extract_sentence(&doc, SelectionRange::new(node), "w030");

        assert!(sentence.contains("w030"));
        assert!(sentence.starts_with("..."));
        assert!(sentence.ends_with("..."));
        assert!(sentence.chars().count() <= 260, "{}", sentence.chars().count());
    }

    #[test]
    fn overlong_sentence_is_windowed_inside_itself() {
        let words = |n: usize| (0..n).map(|i| format!("w{:03}", i)).collect::<Vec<_>>().join(" ");

        let limit = format!("{}.", words(60));
        assert_eq!(limit.chars().count(), MAX_SENTENCE_CHARS);
        let text = format!("Intro here. {limit} Outro.");
        assert_eq!(sentence_or_window(&text, "w030", WINDOW_RADIUS), Some(limit));

        let long = format!("{}.", words(70));
        assert!(long.chars().count() > MAX_SENTENCE_CHARS);
        let text = format!("Intro here. {long} Outro.");
        let snippet = sentence_or_window(&text, "w035", WINDOW_RADIUS).unwrap();

        assert!(snippet.starts_with("...") && snippet.ends_with("..."));
        assert!(snippet.contains("w035"));
        assert!(!snippet.contains("Intro") && !snippet.contains("Outro"));
        assert!(snippet.chars().count() <= 2 * WINDOW_RADIUS + 4 + 6);
    }

    #[test]
    fn window_without_truncation_has_no_ellipsis() {
        assert_eq!(
            window_around("short text here", "text", 100).as_deref(),
            Some("short text here")
        );
        assert_eq!(window_around("short text here", "missing", 100), None);
    }

    #[test]
    fn whitespace_in_selection_is_normalized() {
        let (doc, node) = paragraph("First line.\n  The quick\n   brown fox jumps. End.");
        let sentence = extract_sentence(&doc, SelectionRange::new(node), "quick\nbrown");
        assert_eq!(sentence, "The quick brown fox jumps.");
    }

    #[test]
    fn walks_past_inline_wrappers_to_longer_block() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div");
        doc.append_text(div, "Read this. The ");
        let b = doc.append_element(div, "b");
        let word = doc.append_text(b, "ephemeral");
        doc.append_text(div, " moment passed.");

        let sentence = extract_sentence(&doc, SelectionRange::new(word), "ephemeral");
        assert_eq!(sentence, "The ephemeral moment passed.");
    }

    #[test]
    fn selection_equal_to_container_uses_outer_block() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p");
        doc.append_text(p, "Before. ");
        let span = doc.append_element(p, "span");
        let word = doc.append_text(span, "Serendipity");
        doc.append_text(p, " is rare.");

        let sentence = extract_sentence(&doc, SelectionRange::new(word), "Serendipity");
        assert_eq!(sentence, "Serendipity is rare.");
    }

    #[test]
    fn no_container_returns_trimmed_selection() {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), "body");
        let text = doc.append_text(body, "lonely");

        assert_eq!(extract_sentence(&doc, SelectionRange::new(text), "  lonely "), "lonely");
    }

    #[test]
    fn selection_inside_shadow_root_reaches_host_block() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p");
        doc.append_text(p, "Intro text. ");
        let host = doc.append_element(p, "x-term");
        let shadow = doc.attach_shadow(host);
        let word = doc.append_text(shadow, "Lexicon");
        doc.append_text(p, " entries grow daily. Outro.");

        let sentence = extract_sentence(&doc, SelectionRange::new(word), "Lexicon");
        assert_eq!(sentence, "Lexicon entries grow daily.");
    }

    #[test]
    fn spanning_selection_without_single_sentence_gets_window() {
        let (doc, node) = paragraph("One two. Three four.");
        let sentence = extract_sentence(&doc, SelectionRange::new(node), "two. Three");
        assert_eq!(sentence, "One two. Three four.");
    }

    #[test]
    fn unknown_node_degrades_to_selection() {
        let (doc, _) = paragraph("Cats are great.");
        let mut other = Document::new();
        for _ in 0..50 {
            other.append_element(other.root(), "p");
        }
        let foreign = other.append_text(other.root(), "x");

        assert_eq!(extract_sentence(&doc, SelectionRange::new(foreign), " Cats "), "Cats");
    }
}
