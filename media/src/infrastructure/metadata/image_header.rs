//! Image metadata from header bytes only; pixel data is never decoded.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, ImageReader};

use crate::application::ports::metadata_extractor::{MetadataError, MetadataExtractor};
use crate::application::ports::storage_port::{StoragePort, StoredFile};
use crate::domain::media::extension_policy::is_image_extension;
use crate::domain::media::metadata::{FileMetadata, ImageInfo};

pub struct ImageHeaderExtractor {
    storage: Arc<dyn StoragePort>,
    read_limit: usize,
}

impl ImageHeaderExtractor {
    /// `read_limit` caps how many leading bytes of a file are inspected.
    pub fn new(storage: Arc<dyn StoragePort>, read_limit: usize) -> Self {
        Self {
            storage,
            read_limit,
        }
    }
}

#[async_trait]
impl MetadataExtractor for ImageHeaderExtractor {
    async fn describe(&self, file: &StoredFile) -> Result<FileMetadata, MetadataError> {
        if !is_image_extension(&file.stored_name) {
            return Ok(FileMetadata::plain(file.relative_path.clone()));
        }
        let head = self.storage.read_head(file, self.read_limit).await?;
        let name = file.stored_name.clone();
        let info = tokio::task::spawn_blocking(move || probe_image(&name, head))
            .await
            .map_err(MetadataError::Join)??;
        Ok(FileMetadata::with_image(file.relative_path.clone(), info))
    }
}

pub fn probe_image(name: &str, head: Vec<u8>) -> Result<ImageInfo, MetadataError> {
    let unreadable = |reason: String| MetadataError::Unreadable {
        name: name.to_string(),
        reason,
    };
    let reader = ImageReader::new(Cursor::new(head))
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| MetadataError::UnsupportedFormat(name.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| unreadable(e.to_string()))?;
    Ok(ImageInfo {
        width,
        height,
        kind: format_name(format),
    })
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::FsStoragePort;
    use tempfile::TempDir;

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    async fn setup(temp: &TempDir) -> Arc<FsStoragePort> {
        let public = temp.path().join("public");
        let storage = Arc::new(FsStoragePort::new(public.clone(), public.join("uploads")));
        storage.ensure_root_exists().await.unwrap();
        storage
    }

    #[test]
    fn probes_common_formats() {
        let png = probe_image("a.png", encode(12, 9, ImageFormat::Png)).unwrap();
        assert_eq!((png.width, png.height, png.kind.as_str()), (12, 9, "png"));

        let jpg = probe_image("a.jpg", encode(16, 8, ImageFormat::Jpeg)).unwrap();
        assert_eq!((jpg.width, jpg.height, jpg.kind.as_str()), (16, 8, "jpg"));

        let bmp = probe_image("a.bmp", encode(3, 2, ImageFormat::Bmp)).unwrap();
        assert_eq!((bmp.width, bmp.height, bmp.kind.as_str()), (3, 2, "bmp"));
    }

    #[test]
    fn garbage_is_unsupported() {
        let err = probe_image("a.png", b"not an image at all".to_vec()).unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedFormat(_)));
        assert!(probe_image("empty.png", Vec::new()).is_err());
    }

    #[test]
    fn truncated_header_is_unreadable() {
        let mut png = encode(4, 4, ImageFormat::Png);
        png.truncate(8);
        let err = probe_image("a.png", png).unwrap_err();
        assert!(matches!(err, MetadataError::Unreadable { .. }));
    }

    #[tokio::test]
    async fn describe_is_idempotent_on_unchanged_file() {
        let temp = TempDir::new().unwrap();
        let storage = setup(&temp).await;
        let file = storage
            .write("x_photo.png", &encode(7, 5, ImageFormat::Png))
            .await
            .unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);

        let first = extractor.describe(&file).await.unwrap();
        let second = extractor.describe(&file).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.path, "/uploads/x_photo.png");
        assert_eq!((first.width, first.height), (Some(7), Some(5)));
        assert_eq!(first.kind.as_deref(), Some("png"));
    }

    #[tokio::test]
    async fn describe_reflects_current_content() {
        let temp = TempDir::new().unwrap();
        let storage = setup(&temp).await;
        let file = storage
            .write("y.png", &encode(2, 2, ImageFormat::Png))
            .await
            .unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        assert_eq!(extractor.describe(&file).await.unwrap().width, Some(2));

        std::fs::write(&file.absolute_path, encode(9, 2, ImageFormat::Png)).unwrap();
        assert_eq!(extractor.describe(&file).await.unwrap().width, Some(9));
    }

    #[tokio::test]
    async fn non_image_names_get_path_only() {
        let temp = TempDir::new().unwrap();
        let storage = setup(&temp).await;
        let file = storage.write("notes.bin", b"\x00\x01").await.unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 1024 * 1024);
        let meta = extractor.describe(&file).await.unwrap();
        assert_eq!(meta, FileMetadata::plain("/uploads/notes.bin".into()));
    }

    #[tokio::test]
    async fn read_limit_bounds_inspection() {
        let temp = TempDir::new().unwrap();
        let storage = setup(&temp).await;
        let file = storage
            .write("z.png", &encode(4, 4, ImageFormat::Png))
            .await
            .unwrap();
        let extractor = ImageHeaderExtractor::new(storage.clone(), 8);
        assert!(extractor.describe(&file).await.is_err());
    }
}
