use crate::application::ports::metadata_extractor::{MetadataError, MetadataExtractor};
use crate::application::ports::storage_port::{StorageError, StoragePort};
use crate::domain::media::errors::ValidationError;
use crate::domain::media::extension_policy::is_acceptable_extension;
use crate::domain::media::metadata::FileMetadata;

#[derive(thiserror::Error, Debug)]
pub enum DescribeFileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("File not found")]
    NotFound,
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl From<StorageError> for DescribeFileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound | StorageError::InvalidName(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

pub struct DescribeStoredFile<'a, S, M>
where
    S: StoragePort + ?Sized,
    M: MetadataExtractor + ?Sized,
{
    pub storage: &'a S,
    pub extractor: &'a M,
}

impl<'a, S, M> DescribeStoredFile<'a, S, M>
where
    S: StoragePort + ?Sized,
    M: MetadataExtractor + ?Sized,
{
    pub async fn execute(&self, stored_name: &str) -> Result<FileMetadata, DescribeFileError> {
        if !is_acceptable_extension(stored_name) {
            return Err(ValidationError::InvalidFileExtension.into());
        }
        let file = self.storage.locate(stored_name).await?;
        let metadata = self.extractor.describe(&file).await?;
        Ok(metadata)
    }
}
