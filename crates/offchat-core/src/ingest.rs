use std::fs;
use std::path::{Path, PathBuf};

use crate::chunker::chunk_text;
use crate::error::{Error, Result};
use crate::types::Chunk;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];
const JSON_EXTENSION: &str = "json";

/// Walks an uploads folder and turns every supported file into chunks.
pub struct DirectoryIngest {
    chunk_size: usize,
}

impl DirectoryIngest {
    pub fn new(chunk_size: usize) -> Self { Self { chunk_size } }

    /// Chunk every `.txt`, `.md` and `.json` file under `root`, in path order.
    ///
    /// Files that cannot be read are logged and skipped. Finding no usable
    /// file at all is an error.
    pub fn process_directory(&self, root: &Path) -> Result<Vec<Chunk>> {
        if !root.is_dir() {
            return Err(Error::NotFound(format!("upload directory {}", root.display())));
        }
        let files = list_supported_files(root);
        if files.is_empty() {
            return Err(Error::NotFound(format!("no .txt, .md or .json files under {}", root.display())));
        }
        let mut all_chunks = Vec::new();
        let mut used_files = 0usize;
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::info!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let content = match read_document(file_path) {
                Ok(content) => content,
                Err(e) => { tracing::warn!("Skipping {}: {}", file_path.display(), e); continue; }
            };
            let source = file_path.to_string_lossy().to_string();
            let chunks = chunk_text(&content, self.chunk_size)?;
            all_chunks.extend(chunks.into_iter().map(|c| c.with_source(source.clone())));
            used_files += 1;
        }
        if all_chunks.is_empty() {
            return Err(Error::NotFound(format!("no text extracted from {}", root.display())));
        }
        tracing::info!("Processed {} files into {} chunks", used_files, all_chunks.len());
        Ok(all_chunks)
    }
}

/// Plain text is read as-is (lossy for invalid UTF-8); JSON is parsed and
/// re-serialised compactly so the embedded text is the document's data.
fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    if extension_of(path).as_deref() == Some(JSON_EXTENSION) {
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| Error::json(path, e))?;
        return serde_json::to_string(&value).map_err(|e| Error::json(path, e));
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase)
}

fn list_supported_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| match extension_of(p) {
            Some(ext) => ext == JSON_EXTENSION || TEXT_EXTENSIONS.contains(&ext.as_str()),
            None => false,
        })
        .collect();
    files.sort();
    files
}
