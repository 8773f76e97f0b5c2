use anyhow::{Context, Result, anyhow, ensure};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;

use offchat_core::config::{expand_path, EmbeddingSettings};
pub use offchat_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

/// Sentence-transformers MiniLM (BERT backbone) with mean pooling and L2 normalisation.
pub struct MiniLmEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize }

impl MiniLmEmbedder {
    /// Load `config.json`, `tokenizer.json` and `model.safetensors` (or `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        tracing::info!("Loading embedding model from {}", model_dir.display());
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config_raw = std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&config_raw).with_context(|| format!("parsing {}", config_path.display()))?;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DTYPE, &device);
        let model = BertModel::load(vb, &config).context("building BERT model")?;
        let max_len = max_len.min(config.max_position_embeddings);
        tracing::info!("Embedding model loaded (dim={}, max_len={})", config.hidden_size, max_len);
        Ok(Self { model, tokenizer, device, dim: config.hidden_size, max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        ensure!(emb.len() == self.dim, "expected embedding dimension {}, got {}", self.dim, emb.len());
        tracing::debug!("Embedded {} chars in {:?}", text.len(), start.elapsed());
        Ok(emb)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> { self.embed_text(text) }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return candle_core::safetensors::load(&safetensors, device).with_context(|| format!("reading {}", safetensors.display()));
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle).with_context(|| format!("reading {}", pickle.display()))?;
        return weights.into_iter().map(|(name, t)| -> Result<(String, Tensor)> { Ok((name, t.to_device(device)?)) }).collect();
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

/// Deterministic hashing embedder for tests and development.
///
/// Each lower-cased word (punctuation trimmed) is hashed into one of `dim`
/// buckets; the result is L2-normalised. Texts sharing words score higher.
pub struct FakeEmbedder { dim: usize }

impl FakeEmbedder { pub fn new(dim: usize) -> Self { Self { dim } } }

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        ensure!(self.dim > 0, "embedding dimension must be greater than zero");
        let mut v = vec![0f32; self.dim];
        for word in text.split_whitespace() {
            let token = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = usize::try_from(h % self.dim as u64)?;
            v[idx] += 0.5 + ((h >> 32) as u32 as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        Ok(v)
    }
}

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Load the configured backend. Failure here is fatal for a run.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    ensure!(settings.dim > 0, "embedding.dim must be greater than zero");
    if settings.use_fake || fake_requested() {
        tracing::info!("Using FakeEmbedder (dim={})", settings.dim);
        return Ok(Box::new(FakeEmbedder::new(settings.dim)));
    }
    let model_dir = resolve_model_dir(settings)?;
    let embedder = MiniLmEmbedder::load(&model_dir, settings.max_len)?;
    ensure!(embedder.dim == settings.dim, "model dimension {} does not match embedding.dim {}", embedder.dim, settings.dim);
    Ok(Box::new(embedder))
}

fn resolve_model_dir(settings: &EmbeddingSettings) -> Result<PathBuf> {
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = expand_path(&dir);
            if p.exists() { tracing::info!("Using {}: {}", var, p.display()); return Ok(p); }
        }
    }
    let configured = expand_path(&settings.model_dir);
    if configured.exists() { return Ok(configured); }
    Err(anyhow!("Could not locate embedding model directory. Checked APP_MODEL_DIR, MODEL_DIR and {}", configured.display()))
}
