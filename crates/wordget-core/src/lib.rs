pub mod dom;
pub mod preprocess;
pub mod sentence;
pub mod theme;

pub use dom::{Document, NodeId, NodeKind, SelectionRange};
pub use sentence::{SentenceExtractor, extract_sentence, sentence_or_window};
