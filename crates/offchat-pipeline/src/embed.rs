use indicatif::{ProgressBar, ProgressStyle};

use offchat_core::traits::Embedder;

/// Vectors and the texts that produced them, index-aligned.
///
/// `skipped` holds input positions that failed and are absent from both lists.
#[derive(Debug, Default)]
pub struct EmbeddedSet {
    pub vectors: Vec<Vec<f32>>,
    pub texts: Vec<String>,
    pub skipped: Vec<usize>,
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Embed `texts` one at a time.
///
/// A backend error, a vector of the wrong length or one holding NaN or
/// infinite values skips that text with a warning; the run carries on. The
/// text list of the result is rebuilt from the successes only, so
/// `vectors[i]` always belongs to `texts[i]`.
pub fn embed_all(embedder: &dyn Embedder, texts: &[String], pb: &ProgressBar) -> EmbeddedSet {
    let dim = embedder.dim();
    let mut out = EmbeddedSet::default();
    for (i, text) in texts.iter().enumerate() {
        match embedder.embed_text(text) {
            Ok(vector) if vector.len() == dim && vector.iter().all(|x| x.is_finite()) => {
                out.vectors.push(vector);
                out.texts.push(text.clone());
            }
            Ok(vector) if vector.len() != dim => {
                tracing::warn!("Skipping text at index {}: embedding has {} values, expected {}", i, vector.len(), dim);
                out.skipped.push(i);
            }
            Ok(_) => {
                tracing::warn!("Skipping text at index {}: embedding contains non-finite values", i);
                out.skipped.push(i);
            }
            Err(e) => {
                tracing::warn!("Error embedding text at index {}: {:#}", i, e);
                out.skipped.push(i);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("embedded {}, skipped {}", out.vectors.len(), out.skipped.len()));
    out
}
