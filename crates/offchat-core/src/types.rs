//! Domain types shared by the chunker, the store and the retriever.

use serde::{Deserialize, Serialize};

/// A fixed-size run of words cut from a source document.
///
/// - `text`: the words of the chunk joined by single spaces
/// - `source`: originating file, only set by directory ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// One ranked match from the vector store.
///
/// `index` is the position shared by the vector index and the text map.
/// `score` is cosine similarity, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f32,
    pub text: String,
}
