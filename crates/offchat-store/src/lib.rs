//! File-resident vector store.
//!
//! Layout under one directory: `gen-NNNNNN/vector_index.json` (array of
//! vectors) and `gen-NNNNNN/text_map.json` (`"i" -> text`), a `CURRENT` file
//! naming the live generation, and a `.lock` file. Position `i` of the index
//! and key `"i"` of the map always describe the same chunk.

pub mod chunks;
mod fsutil;
pub mod lock;
pub mod paths;
pub mod reader;
pub mod search;
mod text_map;
pub mod writer;

pub use chunks::{load_chunk_texts, read_chunks, write_chunks, ChunkTexts};
pub use lock::StoreLock;
pub use paths::{GenerationFiles, StorePaths};
pub use reader::LoadedStore;
pub use search::{cosine_similarity, rank};
pub use writer::{StoreSummary, VectorStoreWriter};
