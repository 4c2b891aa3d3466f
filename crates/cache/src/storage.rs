//! Storage medium behind the persistent tier.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{CacheError, Result};

/// A flat namespace of named byte blobs.
///
/// Implementations may fail on any call; [`PersistentCache`](crate::PersistentCache)
/// absorbs those failures.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Returns `None` when `name` does not exist.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Returns whether something was removed.
    async fn remove(&self, name: &str) -> Result<bool>;

    async fn list(&self) -> Result<Vec<String>>;
}

/// [`Storage`] over a single directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Opens `root`, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| io_error(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.path(name);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;
        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, e))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}
