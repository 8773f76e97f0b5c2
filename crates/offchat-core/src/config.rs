//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys).
//! Provides a helper to expand `~` and `${VAR}` in configured paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::chunker::DEFAULT_CHUNK_SIZE;
use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name };
        config.validate_for_env()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str { &self.env_name }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view of the whole configuration, defaults filled in.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self) -> anyhow::Result<()> {
        if matches!(self.env_name.as_str(), "prod" | "production") {
            let use_fake: bool = self.get("embedding.use_fake").unwrap_or(false);
            if use_fake {
                anyhow::bail!("embedding.use_fake must not be enabled in production");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub chunks_file: String,
    pub vector_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            chunks_file: "data/chunks/chunks.json".to_string(),
            vector_dir: "data/vectorstore".to_string(),
        }
    }
}

impl PathSettings {
    pub fn chunks_file(&self) -> PathBuf { expand_path(&self.chunks_file) }
    pub fn vector_dir(&self) -> PathBuf { expand_path(&self.vector_dir) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub size: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self { Self { size: DEFAULT_CHUNK_SIZE } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: String,
    pub max_len: usize,
    pub dim: usize,
    pub use_fake: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: "models/all-MiniLM-L6-v2".to_string(), max_len: 256, dim: 384, use_fake: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self { Self { top_k: 3, min_score: None, timeout_secs: 30 } }
}

impl SearchSettings {
    /// `None` when the timeout is disabled (`timeout_secs = 0`).
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.chunking.size == 0 {
            return Err(Error::InvalidConfig("chunking.size must be greater than zero".to_string()));
        }
        if self.embedding.dim == 0 || self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding.dim and embedding.max_len must be greater than zero".to_string()));
        }
        if self.search.top_k == 0 {
            return Err(Error::InvalidConfig("search.top_k must be greater than zero".to_string()));
        }
        if let Some(min) = self.search.min_score {
            if !(-1.0..=1.0).contains(&min) {
                return Err(Error::InvalidConfig(format!("search.min_score {min} outside [-1, 1]")));
            }
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
