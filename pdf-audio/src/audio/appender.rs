//! Appending synthesized audio to the destination file.
//!
//! MP3 frames are self-delimiting, so byte-level concatenation of per-chunk
//! payloads produces a playable file without re-encoding.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Create the destination file in `dir` if it does not exist yet.
///
/// An existing file is left untouched: it is never truncated.
pub async fn create_destination(dir: &Path, file_name: &str) -> io::Result<PathBuf> {
    let path = dir.join(file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await?;
    Ok(path)
}

/// Exclusive append handle on the destination file for one run.
pub struct AppendWriter {
    path: PathBuf,
    file: File,
    bytes_written: u64,
}

impl AppendWriter {
    /// Open an existing destination for appending.
    pub async fn open(destination: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(destination).await?;
        Ok(Self {
            path: destination.to_path_buf(),
            file,
            bytes_written: 0,
        })
    }

    /// Append raw bytes and flush them so the partial file is playable.
    pub async fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes).await?;
        self.file.flush().await?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Read `source` fully and append its bytes. Returns the number appended.
    pub async fn append_from(&mut self, source: &Path) -> io::Result<u64> {
        let bytes = tokio::fs::read(source).await?;
        self.append(&bytes).await?;
        Ok(bytes.len() as u64)
    }

    /// Bytes appended through this handle.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and sync to disk. Returns the bytes appended through this handle.
    pub async fn close(mut self) -> io::Result<u64> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.bytes_written)
    }
}
