use async_trait::async_trait;

use crate::application::ports::storage_port::{StorageError, StoredFile};
use crate::domain::media::metadata::FileMetadata;

#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("unreadable image header in {name}: {reason}")]
    Unreadable { name: String, reason: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("metadata task failed")]
    Join(#[source] tokio::task::JoinError),
}

#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn describe(&self, file: &StoredFile) -> Result<FileMetadata, MetadataError>;
}
