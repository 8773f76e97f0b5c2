use std::fs;

use offchat_core::error::{Error, Result};

use crate::fsutil::{ensure_dir, persist, stage_bytes, stage_json};
use crate::lock::StoreLock;
use crate::paths::{generation_name, parse_generation, StorePaths};
use crate::text_map::TextMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub entries: usize,
    pub dim: usize,
    pub generation: u64,
}

/// Replaces the whole store in one go; there is no append mode.
pub struct VectorStoreWriter {
    paths: StorePaths,
}

impl VectorStoreWriter {
    pub fn new(paths: StorePaths) -> Self { Self { paths } }

    pub fn paths(&self) -> &StorePaths { &self.paths }

    /// Validate the pairing, then switch the store to the new pair in one step.
    ///
    /// `texts[i]` must be the text that produced `vectors[i]`, and every vector
    /// must have the same length. Both files go into the next generation
    /// directory; only the final rename of `CURRENT` makes them visible, so on
    /// any error the previous store is untouched.
    pub fn write(&self, vectors: &[Vec<f32>], texts: &[String]) -> Result<StoreSummary> {
        if vectors.len() != texts.len() {
            return Err(Error::Misaligned { vectors: vectors.len(), texts: texts.len() });
        }
        let dim = check_uniform_dim(vectors)?;

        ensure_dir(&self.paths.dir)?;
        let _guard = StoreLock::exclusive(&self.paths)?;
        let generation = self.paths.current_generation()?.map_or(1, |g| g + 1);
        let files = self.paths.generation(generation);
        ensure_dir(&files.dir)?;

        persist(stage_json(&files.vector_index, vectors)?, &files.vector_index)?;
        persist(stage_json(&files.text_map, &TextMap(texts))?, &files.text_map)?;
        persist(stage_bytes(&self.paths.current, generation_name(generation).as_bytes())?, &self.paths.current)?;
        tracing::info!("Saved {} entries to {}", vectors.len(), files.dir.display());

        self.prune(generation);
        Ok(StoreSummary { entries: vectors.len(), dim, generation })
    }

    /// Drop every generation directory except `keep`. Failures only warn.
    fn prune(&self, keep: u64) {
        let entries = match fs::read_dir(&self.paths.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Could not list {} for cleanup: {}", self.paths.dir.display(), e);
                return;
            }
        };
        for entry in entries.filter_map(std::result::Result::ok) {
            let stale = entry.file_name().to_str().and_then(parse_generation).is_some_and(|g| g != keep);
            if stale {
                if let Err(e) = fs::remove_dir_all(entry.path()) {
                    tracing::warn!("Could not remove old generation {}: {}", entry.path().display(), e);
                }
            }
        }
    }
}

/// Shared vector length, or 0 for an empty set.
pub(crate) fn check_uniform_dim(vectors: &[Vec<f32>]) -> Result<usize> {
    let dim = vectors.first().map_or(0, Vec::len);
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(Error::DimensionMismatch { expected: dim, found: bad.len() });
    }
    Ok(dim)
}
