use std::cmp::Ordering;

use offchat_core::error::{Error, Result};
use offchat_core::types::SearchHit;

use crate::reader::LoadedStore;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;
    if !denom.is_finite() || denom <= 1e-12 {
        return 0.0;
    }
    let score = dot / denom;
    if score.is_finite() { score } else { 0.0 }
}

/// Exhaustive scan: `(position, score)` of the best `k` vectors, best first.
/// Equal scores keep the lower position first.
pub fn rank(vectors: &[Vec<f32>], query: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_similarity(v, query)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}

impl LoadedStore {
    /// Top `k` entries for `query`, optionally dropping hits below `min_score`.
    ///
    /// No deduplication. An empty store yields no hits.
    pub fn search(&self, query: &[f32], k: usize, min_score: Option<f32>) -> Result<Vec<SearchHit>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dim() {
            return Err(Error::DimensionMismatch { expected: self.dim(), found: query.len() });
        }
        Ok(rank(self.vectors(), query, k)
            .into_iter()
            .filter(|(_, score)| min_score.map_or(true, |min| *score >= min))
            .map(|(index, score)| SearchHit { index, score, text: self.texts()[index].clone() })
            .collect())
    }
}
