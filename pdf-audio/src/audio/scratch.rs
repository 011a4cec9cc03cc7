//! Per-chunk scratch files.
//!
//! The synthesis client writes each chunk's audio to a local file. Every chunk
//! gets a fresh file that is deleted when the handle drops, so nothing from a
//! previous chunk can leak into the next one.

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Directory for scratch files: <cache>/pdf-audio/scratch
pub fn scratch_dir() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join("pdf-audio").join("scratch"))
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;

    std::fs::create_dir_all(&dir).context("Failed to create scratch directory")?;
    Ok(dir)
}

/// A scratch file that lives for one chunk.
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    /// Create a new empty scratch file in `dir`.
    pub fn create(dir: &Path, index: usize) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(&format!("chunk-{:05}-", index))
            .suffix(".mp3")
            .tempfile_in(dir)?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any error.
    pub fn remove(self) -> io::Result<()> {
        self.path.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scratch_file_is_fresh_and_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = {
            let scratch = ScratchFile::create(dir.path(), 3).unwrap();
            let path = scratch.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
            assert!(path.file_name().unwrap().to_string_lossy().starts_with("chunk-00003-"));
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_file_remove() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchFile::create(dir.path(), 0).unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(&path, b"stale").unwrap();
        scratch.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_files_are_distinct() {
        let dir = TempDir::new().unwrap();
        let a = ScratchFile::create(dir.path(), 0).unwrap();
        let b = ScratchFile::create(dir.path(), 0).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_scratch_dir() {
        let dir = scratch_dir().unwrap();
        assert!(dir.ends_with("pdf-audio/scratch"));
        assert!(dir.exists());
    }
}
