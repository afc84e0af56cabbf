use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::storage_port::{StorageError, StoragePort, StoredFile};

/// Flat upload directory inside a statically served public root.
pub struct FsStoragePort {
    public_root: PathBuf,
    upload_root: PathBuf,
}

impl FsStoragePort {
    pub fn new(public_root: impl Into<PathBuf>, upload_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            upload_root: upload_root.into(),
        }
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    fn stored_file(&self, stored_name: &str, absolute_path: PathBuf, size: u64) -> StoredFile {
        StoredFile {
            stored_name: stored_name.to_string(),
            relative_path: self.relative_to_public(&absolute_path),
            absolute_path,
            size,
        }
    }
}

#[async_trait::async_trait]
impl StoragePort for FsStoragePort {
    async fn ensure_root_exists(&self) -> Result<(), StorageError> {
        for dir in [&self.public_root, &self.upload_root] {
            if fs::try_exists(dir).await.unwrap_or(false) {
                continue;
            }
            fs::create_dir_all(dir).await.map_err(|err| {
                tracing::warn!(error = ?err, dir = %dir.display(), "create_storage_dir_failed");
                err
            })?;
            tracing::info!(dir = %dir.display(), "storage_dir_created");
        }
        Ok(())
    }

    async fn write(&self, stored_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let path = self.resolve(stored_name)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(stored_name.to_string()));
            }
            Err(source) => {
                return Err(StorageError::Write {
                    name: stored_name.to_string(),
                    source,
                });
            }
        };

        let mut written = file.write_all(bytes).await;
        if written.is_ok() {
            written = file.sync_all().await;
        }
        drop(file);
        if let Err(source) = written {
            // Leave no partial file behind under a name clients never saw.
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::Write {
                name: stored_name.to_string(),
                source,
            });
        }

        tracing::debug!(stored_name = %stored_name, size = bytes.len(), "stored_file_written");
        Ok(self.stored_file(stored_name, path, bytes.len() as u64))
    }

    async fn delete(&self, stored_name: &str) -> bool {
        let Ok(path) = self.resolve(stored_name) else {
            return false;
        };
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = ?err, stored_name = %stored_name, "remove_stored_file_failed");
                false
            }
        }
    }

    async fn exists(&self, stored_name: &str) -> bool {
        match self.resolve(stored_name) {
            Ok(path) => fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn locate(&self, stored_name: &str) -> Result<StoredFile, StorageError> {
        let path = self.resolve(stored_name)?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(StorageError::NotFound),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(source) => {
                return Err(StorageError::Read {
                    name: stored_name.to_string(),
                    source,
                });
            }
        };
        Ok(self.stored_file(stored_name, path, meta.len()))
    }

    async fn read_head(&self, file: &StoredFile, limit: usize) -> Result<Vec<u8>, StorageError> {
        let read_err = |source: std::io::Error| StorageError::Read {
            name: file.stored_name.clone(),
            source,
        };
        let handle = fs::File::open(&file.absolute_path).await.map_err(read_err)?;
        let mut buf = Vec::with_capacity(limit.min(64 * 1024));
        handle
            .take(limit as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(read_err)?;
        Ok(buf)
    }

    fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        crate::infrastructure::storage::resolve_under(self.upload_root.as_path(), stored_name)
    }

    fn relative_to_public(&self, abs: &Path) -> String {
        crate::infrastructure::storage::relative_from_public(self.public_root.as_path(), abs)
    }
}
