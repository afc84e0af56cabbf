use crate::application::ports::storage_port::StoragePort;
use crate::domain::media::errors::ValidationError;
use crate::domain::media::extension_policy::is_acceptable_extension;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DeleteFileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("File not found")]
    NotFound,
    #[error("Error deleting file")]
    Failed,
}

pub struct DeleteStoredFile<'a, S>
where
    S: StoragePort + ?Sized,
{
    pub storage: &'a S,
}

impl<'a, S> DeleteStoredFile<'a, S>
where
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, stored_name: &str) -> Result<(), DeleteFileError> {
        if !is_acceptable_extension(stored_name) {
            return Err(ValidationError::InvalidFileExtension.into());
        }
        if !self.storage.exists(stored_name).await {
            return Err(DeleteFileError::NotFound);
        }
        if !self.storage.delete(stored_name).await {
            tracing::warn!(stored_name = %stored_name, "delete_stored_file_failed");
            return Err(DeleteFileError::Failed);
        }
        tracing::info!(stored_name = %stored_name, "stored_file_deleted");
        Ok(())
    }
}
