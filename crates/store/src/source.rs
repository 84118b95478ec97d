//! Where snapshots come from.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// A persisted JSON snapshot that can be read in full.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;

    async fn read(&self) -> io::Result<Vec<u8>>;
}

/// Snapshot stored as a file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
