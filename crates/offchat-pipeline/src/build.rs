use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use std::path::Path;

use offchat_core::config::Settings;
use offchat_core::traits::Embedder;
use offchat_embed::get_default_embedder;
use offchat_store::{load_chunk_texts, ChunkTexts, StorePaths, VectorStoreWriter};

use crate::embed::{embed_all, progress_bar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub embedded: usize,
    /// Input positions that failed to embed and are absent from the store.
    pub skipped: Vec<usize>,
    pub dim: usize,
}

/// Embed every text and replace the store with the survivors.
///
/// Nothing is written unless at least one text embedded successfully.
pub fn build_store(texts: &[String], embedder: &dyn Embedder, writer: &VectorStoreWriter, pb: &ProgressBar) -> Result<BuildReport> {
    if texts.is_empty() { bail!("no texts to embed"); }
    let set = embed_all(embedder, texts, pb);
    if set.vectors.is_empty() {
        bail!("all {} texts failed to embed; store at {} left unchanged", texts.len(), writer.paths().dir.display());
    }
    let summary = writer.write(&set.vectors, &set.texts)?;
    tracing::debug!("Store generation {} written", summary.generation);
    Ok(BuildReport { embedded: summary.entries, skipped: set.skipped, dim: summary.dim })
}

/// [`build_store`] over chunks loaded from a file; `skipped` holds chunk-file positions.
pub fn build_chunks(chunks: &ChunkTexts, embedder: &dyn Embedder, writer: &VectorStoreWriter, pb: &ProgressBar) -> Result<BuildReport> {
    let mut report = build_store(&chunks.texts, embedder, writer, pb)?;
    report.skipped = report.skipped.iter().filter_map(|&i| chunks.positions.get(i).copied()).collect();
    Ok(report)
}

/// One full run: read `chunks_file`, load the backend, embed, write the store.
pub fn run_build(settings: &Settings, chunks_file: &Path) -> Result<BuildReport> {
    let chunks = load_chunk_texts(chunks_file).with_context(|| format!("loading chunks from {}", chunks_file.display()))?;
    tracing::info!("Loaded {} texts from {}", chunks.texts.len(), chunks_file.display());
    let embedder = get_default_embedder(&settings.embedding).context("loading embedding model")?;
    let writer = VectorStoreWriter::new(StorePaths::new(settings.paths.vector_dir()));
    let report = build_chunks(&chunks, embedder.as_ref(), &writer, &progress_bar(chunks.texts.len()))?;
    tracing::info!("Vector store generation complete: {} embedded, {} skipped, dim {}", report.embedded, report.skipped.len(), report.dim);
    Ok(report)
}
