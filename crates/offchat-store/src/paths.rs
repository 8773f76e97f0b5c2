use std::fs;
use std::path::{Path, PathBuf};

use offchat_core::error::{Error, Result};

pub const VECTOR_INDEX_FILE: &str = "vector_index.json";
pub const TEXT_MAP_FILE: &str = "text_map.json";
pub const CURRENT_FILE: &str = "CURRENT";
pub const LOCK_FILE: &str = ".lock";
const GENERATION_PREFIX: &str = "gen-";

/// Locations inside one store directory.
///
/// Each write lands in a fresh `gen-NNNNNN/` directory holding both store
/// files; `CURRENT` names the generation readers should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub dir: PathBuf,
    pub current: PathBuf,
    pub lock: PathBuf,
}

/// The file pair of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFiles {
    pub generation: u64,
    pub dir: PathBuf,
    pub vector_index: PathBuf,
    pub text_map: PathBuf,
}

impl StorePaths {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            current: dir.join(CURRENT_FILE),
            lock: dir.join(LOCK_FILE),
            dir,
        }
    }

    pub fn exists(&self) -> bool { self.current.is_file() }

    pub fn generation(&self, generation: u64) -> GenerationFiles {
        let dir = self.dir.join(generation_name(generation));
        GenerationFiles {
            generation,
            vector_index: dir.join(VECTOR_INDEX_FILE),
            text_map: dir.join(TEXT_MAP_FILE),
            dir,
        }
    }

    /// Generation named by `CURRENT`, or `None` before the first write.
    pub fn current_generation(&self) -> Result<Option<u64>> {
        let raw = match fs::read_to_string(&self.current) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.current, e)),
        };
        parse_generation(raw.trim())
            .map(Some)
            .ok_or_else(|| Error::CorruptStore(format!("{} names unknown generation {:?}", self.current.display(), raw.trim())))
    }

    /// Files of the live generation; `NotFound` if nothing was written yet.
    pub fn current_files(&self) -> Result<GenerationFiles> {
        match self.current_generation()? {
            Some(generation) => Ok(self.generation(generation)),
            None => Err(Error::NotFound(format!("vector store at {}", self.dir.display()))),
        }
    }
}

pub(crate) fn generation_name(generation: u64) -> String {
    format!("{GENERATION_PREFIX}{generation:06}")
}

pub(crate) fn parse_generation(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(GENERATION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
