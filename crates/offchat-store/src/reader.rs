use offchat_core::error::{Error, Result};

use crate::fsutil::read_json;
use crate::lock::StoreLock;
use crate::paths::StorePaths;
use crate::text_map::OwnedTextMap;
use crate::writer::check_uniform_dim;

/// In-memory copy of a store, checked for alignment on load.
#[derive(Debug, Clone)]
pub struct LoadedStore {
    vectors: Vec<Vec<f32>>,
    texts: Vec<String>,
    dim: usize,
}

impl LoadedStore {
    /// Load the generation named by `CURRENT`.
    pub fn load(paths: &StorePaths) -> Result<Self> {
        if !paths.exists() {
            return Err(Error::NotFound(format!("vector store at {}", paths.dir.display())));
        }
        let (files, vectors, texts) = {
            let _guard = StoreLock::shared(paths)?;
            let files = paths.current_files()?;
            let vectors: Vec<Vec<f32>> = read_json(&files.vector_index)?;
            let OwnedTextMap(texts) = read_json(&files.text_map)?;
            (files, vectors, texts)
        };
        let store = Self::from_parts(vectors, texts)?;
        tracing::info!("Loaded {} vectors (dim={}) from {}", store.len(), store.dim, files.dir.display());
        Ok(store)
    }

    pub fn from_parts(vectors: Vec<Vec<f32>>, texts: Vec<String>) -> Result<Self> {
        if vectors.len() != texts.len() {
            return Err(Error::Misaligned { vectors: vectors.len(), texts: texts.len() });
        }
        let dim = check_uniform_dim(&vectors)?;
        Ok(Self { vectors, texts, dim })
    }

    pub fn len(&self) -> usize { self.vectors.len() }
    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }
    pub fn dim(&self) -> usize { self.dim }
    pub fn vectors(&self) -> &[Vec<f32>] { &self.vectors }
    pub fn texts(&self) -> &[String] { &self.texts }
}
