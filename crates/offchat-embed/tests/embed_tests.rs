use offchat_core::config::EmbeddingSettings;
use offchat_embed::{get_default_embedder, Embedder, FakeEmbedder};

fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    let settings = EmbeddingSettings { use_fake: true, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let v1 = embedder.embed_text("hello world").expect("embed");
    let v2 = embedder.embed_text("hello world").expect("embed");

    assert_eq!(v1.len(), 384, "embedding dim follows settings");
    assert_eq!(embedder.dim(), 384);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_ignores_case_and_punctuation() {
    let embedder = FakeEmbedder::new(64);
    let a = embedder.embed_text("Dogs are mammals?").unwrap();
    let b = embedder.embed_text("dogs ARE mammals").unwrap();
    assert!((cosine(&a, &b) - 1.0).abs() < 1e-5);
}

#[test]
fn fake_embedder_scores_shared_words_higher() {
    let embedder = FakeEmbedder::new(384);
    let q = embedder.embed_text("rust borrow checker").unwrap();
    let near = embedder.embed_text("the borrow checker in rust").unwrap();
    let same = embedder.embed_text("rust borrow checker").unwrap();
    assert!(cosine(&q, &same) > cosine(&q, &near));
    assert!(cosine(&q, &near) > 0.3);
}

#[test]
fn missing_model_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = EmbeddingSettings {
        model_dir: tmp.path().join("absent").to_string_lossy().to_string(),
        ..EmbeddingSettings::default()
    };
    if std::env::var_os("APP_USE_FAKE_EMBEDDINGS").is_some()
        || std::env::var_os("APP_MODEL_DIR").is_some()
        || std::env::var_os("MODEL_DIR").is_some()
    {
        return;
    }
    assert!(get_default_embedder(&settings).is_err());
}

#[test]
fn zero_dimension_is_rejected_instead_of_panicking() {
    let settings = EmbeddingSettings { use_fake: true, dim: 0, ..EmbeddingSettings::default() };
    let err = get_default_embedder(&settings).err().expect("dim 0 rejected");
    assert!(err.to_string().contains("embedding.dim"));

    assert!(FakeEmbedder::new(0).embed_text("hello world").is_err());
}
