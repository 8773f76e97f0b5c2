use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

use offchat_core::error::Error;
use offchat_core::traits::Embedder;
use offchat_core::types::SearchHit;
use offchat_store::{LoadedStore, StorePaths};

/// Answers chat-time queries against a loaded store, in process.
pub struct Retriever {
    store: LoadedStore,
    embedder: Box<dyn Embedder>,
    min_score: Option<f32>,
}

impl Retriever {
    pub fn new(store: LoadedStore, embedder: Box<dyn Embedder>) -> Result<Self> {
        if !store.is_empty() && store.dim() != embedder.dim() {
            return Err(Error::DimensionMismatch { expected: store.dim(), found: embedder.dim() }.into());
        }
        Ok(Self { store, embedder, min_score: None })
    }

    pub fn open(paths: &StorePaths, embedder: Box<dyn Embedder>) -> Result<Self> {
        Self::new(LoadedStore::load(paths)?, embedder)
    }

    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn store(&self) -> &LoadedStore { &self.store }

    pub fn search_hits(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.store.is_empty() { return Ok(Vec::new()); }
        let q_vec = self.embedder.embed_text(query).map_err(|e| Error::Embedding(format!("{e:#}")))?;
        Ok(self.store.search(&q_vec, top_k, self.min_score)?)
    }

    /// Texts of the `top_k` most similar chunks, best first.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self.search_hits(query, top_k)?.into_iter().map(|h| h.text).collect())
    }

    /// Runs the search on the blocking pool; `None` waits indefinitely.
    pub async fn search_with_timeout(self: Arc<Self>, query: String, top_k: usize, timeout: Option<Duration>) -> Result<Vec<SearchHit>> {
        let task = tokio::task::spawn_blocking(move || self.search_hits(&query, top_k));
        let joined = match timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| Error::Timeout(limit))?,
            None => task.await,
        };
        joined.map_err(|e| anyhow!("search task failed: {}", e))?
    }
}
