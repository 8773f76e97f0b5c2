/// Sentence-embedding backend.
///
/// Implementations return mean-pooled, L2-normalised vectors of exactly
/// `dim()` values.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> { (**self).embed_text(text) }
}
