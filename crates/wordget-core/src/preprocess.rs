use unicode_normalization::UnicodeNormalization;

/// Trim and fold every whitespace run (newlines, tabs, nbsp) into one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive identity of a word entry's text
pub fn dedup_key(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}
