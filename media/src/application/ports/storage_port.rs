use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub stored_name: String,
    pub absolute_path: PathBuf,
    /// Path below the public root, `/`-prefixed.
    pub relative_path: String,
    pub size: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("file name is not allowed: {0}")]
    InvalidName(String),
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    #[error("File not found")]
    NotFound,
    #[error("error writing file {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading file {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Creates the public root and upload directory when absent.
    async fn ensure_root_exists(&self) -> Result<(), StorageError>;
    /// Create-if-absent write; never overwrites an existing file.
    async fn write(&self, stored_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError>;
    /// Returns `false` when the file is missing or could not be removed.
    async fn delete(&self, stored_name: &str) -> bool;
    async fn exists(&self, stored_name: &str) -> bool;
    /// Existing stored file by name.
    async fn locate(&self, stored_name: &str) -> Result<StoredFile, StorageError>;
    /// Reads at most `limit` bytes from the start of the file.
    async fn read_head(&self, file: &StoredFile, limit: usize) -> Result<Vec<u8>, StorageError>;
    fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError>;
    fn relative_to_public(&self, abs: &Path) -> String;
}
