use fs2::FileExt;
use std::fs::{File, OpenOptions};

use offchat_core::error::{Error, Result};

use crate::fsutil::ensure_dir;
use crate::paths::StorePaths;

/// Advisory lock on a store directory, released on drop.
///
/// Writers hold it exclusively for the whole write; readers share it while
/// loading, so a reader never observes a half-replaced pair of files.
pub struct StoreLock {
    file: File,
}

impl StoreLock {
    pub fn exclusive(paths: &StorePaths) -> Result<Self> {
        let file = open_lock_file(paths)?;
        file.lock_exclusive().map_err(|e| Error::io(&paths.lock, e))?;
        Ok(Self { file })
    }

    pub fn shared(paths: &StorePaths) -> Result<Self> {
        let file = open_lock_file(paths)?;
        file.lock_shared().map_err(|e| Error::io(&paths.lock, e))?;
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open_lock_file(paths: &StorePaths) -> Result<File> {
    ensure_dir(&paths.dir)?;
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&paths.lock)
        .map_err(|e| Error::io(&paths.lock, e))
}
