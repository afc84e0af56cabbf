use crate::application::ports::metadata_extractor::{MetadataError, MetadataExtractor};
use crate::application::ports::storage_port::{StorageError, StoragePort, StoredFile};
use crate::domain::media::errors::ValidationError;
use crate::domain::media::extension_policy::is_acceptable_extension;
use crate::domain::media::metadata::FileMetadata;
use crate::domain::media::stored_name;
use crate::domain::media::upload::UploadedFile;

/// Bounded number of names tried for one attachment before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 5;

pub struct IngestUploads<'a, S, M>
where
    S: StoragePort + ?Sized,
    M: MetadataExtractor + ?Sized,
{
    pub storage: &'a S,
    pub extractor: &'a M,
}

/// What the client sent for one attachment, kept after its bytes are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub field_name: String,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

impl From<&UploadedFile> for AttachmentInfo {
    fn from(upload: &UploadedFile) -> Self {
        Self {
            field_name: upload.field_name.clone(),
            original_name: upload.original_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.size(),
        }
    }
}

#[derive(Debug)]
pub enum IngestionOutcome {
    Stored {
        file: StoredFile,
        metadata: FileMetadata,
    },
    Rejected {
        reason: ValidationError,
    },
    WriteFailed {
        error: StorageError,
    },
    /// Written to disk, but metadata could not be extracted. The file is kept.
    StoredButUndescribed {
        file: StoredFile,
        error: MetadataError,
    },
}

#[derive(Debug)]
pub struct IngestionResult {
    pub attachment: AttachmentInfo,
    pub outcome: IngestionOutcome,
}

impl IngestionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, IngestionOutcome::Stored { .. })
    }

    pub fn stored_file(&self) -> Option<&StoredFile> {
        match &self.outcome {
            IngestionOutcome::Stored { file, .. }
            | IngestionOutcome::StoredButUndescribed { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&ValidationError> {
        match &self.outcome {
            IngestionOutcome::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}

impl<'a, S, M> IngestUploads<'a, S, M>
where
    S: StoragePort + ?Sized,
    M: MetadataExtractor + ?Sized,
{
    /// One result per attachment, in arrival order. Only an empty request is
    /// an error; every per-attachment failure is reported in its result.
    pub async fn execute(
        &self,
        attachments: Vec<UploadedFile>,
    ) -> Result<Vec<IngestionResult>, ValidationError> {
        if attachments.is_empty() {
            return Err(ValidationError::NoFileAttached);
        }
        let mut results = Vec::with_capacity(attachments.len());
        for upload in attachments {
            results.push(self.ingest_one(upload).await);
        }
        Ok(results)
    }

    async fn ingest_one(&self, upload: UploadedFile) -> IngestionResult {
        let attachment = AttachmentInfo::from(&upload);
        if !is_acceptable_extension(&upload.original_name) {
            tracing::info!(original_name = %upload.original_name, "upload_rejected_invalid_extension");
            return IngestionResult {
                attachment,
                outcome: IngestionOutcome::Rejected {
                    reason: ValidationError::InvalidExtension,
                },
            };
        }

        let stored = self.store(&upload).await;
        drop(upload);
        let file = match stored {
            Ok(file) => file,
            Err(error) => {
                tracing::error!(error = ?error, original_name = %attachment.original_name, "store_upload_failed");
                return IngestionResult {
                    attachment,
                    outcome: IngestionOutcome::WriteFailed { error },
                };
            }
        };

        let outcome = match self.extractor.describe(&file).await {
            Ok(metadata) => IngestionOutcome::Stored { file, metadata },
            Err(error) => {
                tracing::warn!(error = %error, stored_name = %file.stored_name, "metadata_extraction_failed");
                IngestionOutcome::StoredButUndescribed { file, error }
            }
        };
        IngestionResult {
            attachment,
            outcome,
        }
    }

    async fn store(&self, upload: &UploadedFile) -> Result<StoredFile, StorageError> {
        let base = stored_name::generate(&upload.original_name);
        let mut candidate = base.clone();
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            match self.storage.write(&candidate, &upload.bytes).await {
                Err(StorageError::AlreadyExists(_)) => {
                    tracing::debug!(candidate = %candidate, attempt, "stored_name_collision");
                    candidate = stored_name::disambiguate(&base, &stored_name::random_token());
                }
                other => return other,
            }
        }
        Err(StorageError::AlreadyExists(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::metadata::ImageHeaderExtractor;
    use crate::infrastructure::storage::FsStoragePort;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn upload(name: &str, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile::new("files", name, Some("image/png".into()), bytes)
    }

    fn fs_storage(temp: &TempDir) -> Arc<FsStoragePort> {
        let public = temp.path().join("public");
        Arc::new(FsStoragePort::new(public.clone(), public.join("uploads")))
    }

    fn stored_count(storage: &FsStoragePort) -> usize {
        std::fs::read_dir(storage.upload_root())
            .map(|it| it.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn empty_request_is_a_request_level_error() {
        let temp = TempDir::new().unwrap();
        let storage = fs_storage(&temp);
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: storage.as_ref(),
            extractor: &extractor,
        };
        let err = uc.execute(Vec::new()).await.unwrap_err();
        assert_eq!(err, ValidationError::NoFileAttached);
    }

    #[tokio::test]
    async fn results_follow_arrival_order_and_isolate_failures() {
        let temp = TempDir::new().unwrap();
        let storage = fs_storage(&temp);
        storage.ensure_root_exists().await.unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: storage.as_ref(),
            extractor: &extractor,
        };

        let results = uc
            .execute(vec![
                upload("a.png", png_bytes(5, 7)),
                upload("b.invalid", b"nope".to_vec()),
                upload("c.png", png_bytes(2, 3)),
            ])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert_eq!(results[1].rejection(), Some(&ValidationError::InvalidExtension));
        assert!(results[2].is_success());
        assert_eq!(results[1].attachment.original_name, "b.invalid");

        match &results[0].outcome {
            IngestionOutcome::Stored { file, metadata } => {
                assert!(file.stored_name.ends_with("_a.png"));
                assert_eq!(metadata.width, Some(5));
                assert_eq!(metadata.height, Some(7));
                assert_eq!(metadata.path, format!("/uploads/{}", file.stored_name));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(stored_count(&storage), 2);
    }

    #[tokio::test]
    async fn rejected_attachment_touches_no_storage() {
        let temp = TempDir::new().unwrap();
        let storage = fs_storage(&temp);
        storage.ensure_root_exists().await.unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: storage.as_ref(),
            extractor: &extractor,
        };
        let results = uc
            .execute(vec![upload("example.invalid", b"data".to_vec())])
            .await
            .unwrap();
        assert!(!results[0].is_success());
        assert!(results[0].stored_file().is_none());
        assert_eq!(stored_count(&storage), 0);
    }

    #[tokio::test]
    async fn corrupt_image_is_stored_but_undescribed() {
        let temp = TempDir::new().unwrap();
        let storage = fs_storage(&temp);
        storage.ensure_root_exists().await.unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: storage.as_ref(),
            extractor: &extractor,
        };
        let results = uc
            .execute(vec![upload("broken.jpg", b"definitely not a jpeg".to_vec())])
            .await
            .unwrap();
        match &results[0].outcome {
            IngestionOutcome::StoredButUndescribed { file, .. } => {
                assert!(storage.exists(&file.stored_name).await);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_upload_directory_is_a_write_failure() {
        let temp = TempDir::new().unwrap();
        let storage = fs_storage(&temp);
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: storage.as_ref(),
            extractor: &extractor,
        };
        let results = uc
            .execute(vec![upload("a.png", png_bytes(1, 1)), upload("b.png", png_bytes(1, 1))])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(matches!(result.outcome, IngestionOutcome::WriteFailed { .. }));
        }
    }

    /// Storage whose first `collisions` writes report an existing file.
    struct CollidingStorage {
        inner: Arc<FsStoragePort>,
        collisions: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StoragePort for CollidingStorage {
        async fn ensure_root_exists(&self) -> Result<(), StorageError> {
            self.inner.ensure_root_exists().await
        }
        async fn write(&self, stored_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.collisions {
                return Err(StorageError::AlreadyExists(stored_name.to_string()));
            }
            self.inner.write(stored_name, bytes).await
        }
        async fn delete(&self, stored_name: &str) -> bool {
            self.inner.delete(stored_name).await
        }
        async fn exists(&self, stored_name: &str) -> bool {
            self.inner.exists(stored_name).await
        }
        async fn locate(&self, stored_name: &str) -> Result<StoredFile, StorageError> {
            self.inner.locate(stored_name).await
        }
        async fn read_head(&self, file: &StoredFile, limit: usize) -> Result<Vec<u8>, StorageError> {
            self.inner.read_head(file, limit).await
        }
        fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
            self.inner.resolve(stored_name)
        }
        fn relative_to_public(&self, abs: &Path) -> String {
            self.inner.relative_to_public(abs)
        }
    }

    #[tokio::test]
    async fn collision_regenerates_a_disambiguated_name() {
        let temp = TempDir::new().unwrap();
        let inner = fs_storage(&temp);
        inner.ensure_root_exists().await.unwrap();
        let storage = CollidingStorage {
            inner: inner.clone(),
            collisions: 2,
            calls: AtomicUsize::new(0),
        };
        let extractor = ImageHeaderExtractor::new(inner.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: &storage,
            extractor: &extractor,
        };
        let results = uc
            .execute(vec![upload("photo.png", png_bytes(2, 2))])
            .await
            .unwrap();
        let file = results[0].stored_file().expect("stored");
        assert!(file.stored_name.ends_with(".png"));
        assert!(file.stored_name.contains("_photo-"));
        assert_eq!(storage.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn persistent_collisions_give_up_after_bounded_attempts() {
        let temp = TempDir::new().unwrap();
        let inner = fs_storage(&temp);
        inner.ensure_root_exists().await.unwrap();
        let storage = CollidingStorage {
            inner: inner.clone(),
            collisions: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let extractor = ImageHeaderExtractor::new(inner.clone(), 1024 * 1024);
        let uc = IngestUploads {
            storage: &storage,
            extractor: &extractor,
        };
        let results = uc
            .execute(vec![upload("photo.png", png_bytes(2, 2))])
            .await
            .unwrap();
        assert!(matches!(
            results[0].outcome,
            IngestionOutcome::WriteFailed {
                error: StorageError::AlreadyExists(_)
            }
        ));
        assert_eq!(storage.calls.load(Ordering::SeqCst), MAX_NAME_ATTEMPTS);
        assert_eq!(stored_count(&inner), 0);
    }
}
