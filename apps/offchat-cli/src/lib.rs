//! Shared setup for the `offchat` binaries.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use offchat_core::config::{Config, Settings};
use offchat_core::types::SearchHit;
use offchat_embed::get_default_embedder;
use offchat_pipeline::Retriever;
use offchat_store::StorePaths;

pub const NO_ANSWER: &str = "Sorry, I couldn't find a relevant answer.";

/// Logs go to stderr so stdout carries only command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

pub fn load_settings() -> Result<Settings> {
    let config = Config::load().context("loading configuration")?;
    tracing::debug!("Configuration environment: {}", config.env_name());
    config.settings()
}

/// Load the store and the backend, then run one query under the configured timeout.
pub async fn run_query(settings: &Settings, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
    anyhow::ensure!(top_k > 0, "top_k must be greater than zero");
    let embedder = get_default_embedder(&settings.embedding).context("loading embedding model")?;
    let paths = StorePaths::new(settings.paths.vector_dir());
    let retriever = Retriever::open(&paths, embedder)
        .with_context(|| format!("opening vector store at {}", paths.dir.display()))?
        .with_min_score(settings.search.min_score);
    Arc::new(retriever).search_with_timeout(query.to_string(), top_k, settings.search.timeout()).await
}

/// Collapse a text onto one line for line-delimited output.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
