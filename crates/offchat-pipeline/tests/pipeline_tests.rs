use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use offchat_core::config::Settings;
use offchat_core::types::Chunk;
use offchat_core::{chunk_text, Embedder, Error};
use offchat_embed::FakeEmbedder;
use offchat_pipeline::{build_chunks, build_store, embed_all, run_build, Retriever};
use offchat_store::{load_chunk_texts, write_chunks, LoadedStore, StorePaths, VectorStoreWriter};
use tempfile::TempDir;

const VOCAB: &[&str] = &["cats", "dogs", "are", "mammals", "the", "sky", "is", "blue"];

/// Bag-of-words over a tiny fixed vocabulary; scores are easy to reason about.
struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut v = vec![0f32; VOCAB.len()];
        for word in text.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if let Some(i) = VOCAB.iter().position(|w| *w == word) { v[i] += 1.0; }
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        Ok(v.into_iter().map(|x| x / norm).collect())
    }
}

/// Fails on any text containing "fail", returns a short vector for "short"
/// and a non-finite one for "nan" or "inf".
struct FlakyEmbedder;

impl Embedder for FlakyEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        if text.contains("fail") { anyhow::bail!("backend exploded"); }
        if text.contains("short") { return Ok(vec![1.0]); }
        if text.contains("nan") { return Ok(vec![f32::NAN, 1.0]); }
        if text.contains("inf") { return Ok(vec![1.0, f32::INFINITY]); }
        Ok(vec![text.len() as f32, 1.0])
    }
}

struct SlowEmbedder;

impl Embedder for SlowEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed_text(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        std::thread::sleep(Duration::from_millis(400));
        Ok(vec![1.0, 0.0])
    }
}

fn texts(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

fn read_text_map(paths: &StorePaths) -> BTreeMap<String, String> {
    serde_json::from_str(&fs::read_to_string(paths.current_files().unwrap().text_map).unwrap()).unwrap()
}

#[test]
fn failed_item_is_dropped_and_text_map_stays_aligned() {
    let tmp = TempDir::new().unwrap();
    let paths = StorePaths::new(tmp.path().join("vectorstore"));
    let writer = VectorStoreWriter::new(paths.clone());
    let input = texts(&["first ok", "please fail", "third ok"]);

    let report = build_store(&input, &FlakyEmbedder, &writer, &ProgressBar::hidden()).expect("build");

    assert_eq!(report.embedded, 2);
    assert_eq!(report.skipped, vec![1]);
    let map = read_text_map(&paths);
    assert_eq!(map.len(), 2);
    assert_eq!(map["0"], "first ok");
    assert_eq!(map["1"], "third ok");
    let store = LoadedStore::load(&paths).unwrap();
    assert_eq!(store.vectors()[1], vec!["third ok".len() as f32, 1.0]);
}

#[test]
fn wrong_length_vector_is_skipped_like_an_error() {
    let set = embed_all(&FlakyEmbedder, &texts(&["short one", "fine", "fail here"]), &ProgressBar::hidden());
    assert_eq!(set.texts, texts(&["fine"]));
    assert_eq!(set.vectors.len(), 1);
    assert_eq!(set.skipped, vec![0, 2]);
}

#[test]
fn non_finite_vector_is_skipped_and_store_stays_loadable() {
    let tmp = TempDir::new().unwrap();
    let paths = StorePaths::new(tmp.path());
    let input = texts(&["nan here", "good", "inf there"]);

    let report = build_store(&input, &FlakyEmbedder, &VectorStoreWriter::new(paths.clone()), &ProgressBar::hidden()).unwrap();

    assert_eq!(report.embedded, 1);
    assert_eq!(report.skipped, vec![0, 2]);
    let store = LoadedStore::load(&paths).expect("store with only finite values loads");
    assert_eq!(store.texts(), &texts(&["good"])[..]);
}

#[test]
fn skipped_positions_refer_to_the_chunk_file() {
    let tmp = TempDir::new().unwrap();
    let chunks_file = tmp.path().join("chunks.json");
    let chunks = vec![Chunk::new(""), Chunk::new("first ok"), Chunk::new(""), Chunk::new("please fail"), Chunk::new("last ok")];
    write_chunks(&chunks_file, &chunks).unwrap();
    let loaded = load_chunk_texts(&chunks_file).unwrap();
    let writer = VectorStoreWriter::new(StorePaths::new(tmp.path().join("vectorstore")));

    let report = build_chunks(&loaded, &FlakyEmbedder, &writer, &ProgressBar::hidden()).unwrap();

    assert_eq!(report.embedded, 2);
    assert_eq!(report.skipped, vec![3]);
}

#[test]
fn all_failures_abort_and_keep_previous_store() {
    let tmp = TempDir::new().unwrap();
    let paths = StorePaths::new(tmp.path());
    let writer = VectorStoreWriter::new(paths.clone());
    writer.write(&[vec![1.0, 1.0]], &texts(&["previous"])).unwrap();

    let result = build_store(&texts(&["fail a", "fail b"]), &FlakyEmbedder, &writer, &ProgressBar::hidden());

    assert!(result.is_err());
    assert_eq!(read_text_map(&paths)["0"], "previous");
}

#[test]
fn dogs_query_ranks_mammal_entries_above_sky() {
    let tmp = TempDir::new().unwrap();
    let paths = StorePaths::new(tmp.path());
    let input = texts(&["cats are mammals", "dogs are mammals", "the sky is blue"]);
    build_store(&input, &KeywordEmbedder, &VectorStoreWriter::new(paths.clone()), &ProgressBar::hidden()).unwrap();

    let retriever = Retriever::open(&paths, Box::new(KeywordEmbedder)).unwrap();
    let hits = retriever.search_hits("are dogs mammals?", 2).unwrap();

    let indices: Vec<usize> = hits.iter().map(|h| h.index).collect();
    assert_eq!(indices, vec![1, 0]);
    assert_eq!(retriever.search("are dogs mammals?", 2).unwrap(), texts(&["dogs are mammals", "cats are mammals"]));
}

#[test]
fn min_score_filters_weak_matches() {
    let store = LoadedStore::from_parts(
        vec![
            KeywordEmbedder.embed_text("cats are mammals").unwrap(),
            KeywordEmbedder.embed_text("the sky is blue").unwrap(),
        ],
        texts(&["cats are mammals", "the sky is blue"]),
    )
    .unwrap();
    let retriever = Retriever::new(store, Box::new(KeywordEmbedder)).unwrap().with_min_score(Some(0.6));

    // "cats mammals" vs "cats are mammals" scores 2/sqrt(6) ~ 0.82; the sky entry scores 0.
    assert_eq!(retriever.search("cats mammals", 3).unwrap(), texts(&["cats are mammals"]));
    assert!(retriever.search("dogs", 3).unwrap().is_empty());
}

#[test]
fn retriever_rejects_embedder_of_other_dimension() {
    let store = LoadedStore::from_parts(vec![vec![1.0, 0.0]], texts(&["x"])).unwrap();
    let err = Retriever::new(store, Box::new(KeywordEmbedder)).err().expect("dimension mismatch");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::DimensionMismatch { expected: 2, found: 8 })));
}

#[test]
fn empty_store_returns_no_results() {
    let store = LoadedStore::from_parts(Vec::new(), Vec::new()).unwrap();
    let retriever = Retriever::new(store, Box::new(SlowEmbedder)).unwrap();
    assert!(retriever.search("anything", 3).unwrap().is_empty());
}

#[tokio::test]
async fn search_with_timeout_returns_hits_in_time() {
    let store = LoadedStore::from_parts(
        vec![KeywordEmbedder.embed_text("the sky is blue").unwrap()],
        texts(&["the sky is blue"]),
    )
    .unwrap();
    let retriever = Arc::new(Retriever::new(store, Box::new(KeywordEmbedder)).unwrap());

    let hits = retriever.search_with_timeout("blue sky".to_string(), 3, Some(Duration::from_secs(5))).await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "the sky is blue");
}

#[tokio::test]
async fn search_with_timeout_reports_slow_backend() {
    let store = LoadedStore::from_parts(vec![vec![1.0, 0.0]], texts(&["x"])).unwrap();
    let retriever = Arc::new(Retriever::new(store, Box::new(SlowEmbedder)).unwrap());

    let err = retriever.search_with_timeout("q".to_string(), 1, Some(Duration::from_millis(20))).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Timeout(_))));
}

#[test]
fn run_build_end_to_end_with_fake_embedder_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let chunks_file = tmp.path().join("chunks/chunks.json");
    let document = "Fire needs fuel heat and oxygen. Water boils at one hundred degrees. ".repeat(20);
    let chunks: Vec<Chunk> = chunk_text(&document, 25).unwrap();
    write_chunks(&chunks_file, &chunks).unwrap();

    let mut settings = Settings::default();
    settings.embedding.use_fake = true;
    settings.paths.vector_dir = tmp.path().join("vectorstore").to_string_lossy().to_string();
    let paths = StorePaths::new(settings.paths.vector_dir());

    let report = run_build(&settings, &chunks_file).expect("first run");
    assert_eq!(report.embedded, chunks.len());
    assert!(report.skipped.is_empty());
    assert_eq!(report.dim, 384);
    let first = fs::read(paths.current_files().unwrap().text_map).unwrap();

    run_build(&settings, &chunks_file).expect("second run");
    assert_eq!(first, fs::read(paths.current_files().unwrap().text_map).unwrap());

    let retriever = Retriever::open(&paths, Box::new(FakeEmbedder::new(384))).unwrap();
    let store = retriever.store();
    assert_eq!(store.len(), store.texts().len());
    assert!(store.vectors().iter().all(|v| v.len() == 384));
    assert_eq!(retriever.search("boils water", 3).unwrap().len(), 3);
}

#[test]
fn run_build_without_chunks_file_fails() {
    let tmp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.embedding.use_fake = true;
    settings.paths.vector_dir = tmp.path().join("vectorstore").to_string_lossy().to_string();

    assert!(run_build(&settings, &tmp.path().join("missing.json")).is_err());
    assert!(!tmp.path().join("vectorstore").exists());
}
