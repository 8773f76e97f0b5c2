use std::path::Path;

use offchat_core::error::{Error, Result};
use offchat_core::types::Chunk;

use crate::fsutil::{ensure_dir, persist, read_json, stage_json};

/// Overwrite `path` with `chunks`, creating parent directories.
pub fn write_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let tmp = stage_json(path, chunks)?;
    persist(tmp, path)?;
    tracing::info!("Saved {} chunks to {}", chunks.len(), path.display());
    Ok(())
}

pub fn read_chunks(path: &Path) -> Result<Vec<Chunk>> {
    read_json(path)
}

/// Non-empty chunk texts, with each one's position in the chunk file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTexts {
    pub positions: Vec<usize>,
    pub texts: Vec<String>,
}

/// Texts of all non-empty chunks, in file order. An empty result is an error.
pub fn load_chunk_texts(path: &Path) -> Result<ChunkTexts> {
    let (positions, texts): (Vec<usize>, Vec<String>) = read_chunks(path)?
        .into_iter()
        .enumerate()
        .filter(|(_, c)| !c.text.is_empty())
        .map(|(i, c)| (i, c.text))
        .unzip();
    if texts.is_empty() {
        return Err(Error::NotFound(format!("no valid texts in {}", path.display())));
    }
    Ok(ChunkTexts { positions, texts })
}
