//! Chunk -> embed -> store orchestration and chat-time retrieval.

pub mod build;
pub mod embed;
pub mod retriever;

pub use build::{build_chunks, build_store, run_build, BuildReport};
pub use embed::{embed_all, progress_bar, EmbeddedSet};
pub use retriever::Retriever;
