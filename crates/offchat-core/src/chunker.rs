use crate::error::{Error, Result};
use crate::types::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Split `text` into consecutive groups of `size` whitespace-delimited words.
///
/// Words are rejoined with single spaces, so runs of whitespace (including
/// newlines) collapse. The last chunk may be shorter. There is no overlap and
/// no sentence awareness: a chunk can end mid-sentence.
pub fn chunk_text(text: &str, size: usize) -> Result<Vec<Chunk>> {
    if size == 0 {
        return Err(Error::InvalidConfig("chunk size must be greater than zero".to_string()));
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words.chunks(size).map(|group| Chunk::new(group.join(" "))).collect())
}
