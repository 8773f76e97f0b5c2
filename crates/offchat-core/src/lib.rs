#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod error;
pub mod ingest;
pub mod traits;
pub mod types;

pub use chunker::{chunk_text, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
pub use traits::Embedder;
pub use types::{Chunk, SearchHit};
