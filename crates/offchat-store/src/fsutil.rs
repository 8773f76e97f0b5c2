use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use offchat_core::error::{Error, Result};

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        tracing::info!("Created directory: {}", dir.display());
    }
    Ok(())
}

/// Serialise `value` as indented JSON into a temp file next to `dest`.
/// Nothing at `dest` changes until the returned file is persisted.
pub(crate) fn stage_json<T: Serialize + ?Sized>(dest: &Path, value: &T) -> Result<NamedTempFile> {
    let tmp = temp_beside(dest)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut out, value).map_err(|e| Error::json(dest, e))?;
        out.flush().map_err(|e| Error::io(dest, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::io(dest, e))?;
    Ok(tmp)
}

pub(crate) fn stage_bytes(dest: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = temp_beside(dest)?;
    tmp.write_all(bytes).map_err(|e| Error::io(dest, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(dest, e))?;
    Ok(tmp)
}

fn temp_beside(dest: &Path) -> Result<NamedTempFile> {
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))
}

pub(crate) fn persist(tmp: NamedTempFile, dest: &Path) -> Result<()> {
    tmp.persist(dest).map_err(|e| Error::io(dest, e.error))?;
    Ok(())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound { Error::NotFound(path.display().to_string()) } else { Error::io(path, e) }
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| Error::json(path, e))
}
