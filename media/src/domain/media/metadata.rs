use serde::Serialize;
use utoipa::ToSchema;

/// Descriptive data derived from a stored file. Computed on demand and never
/// cached, so it always reflects the file's current content.
///
/// Image fields are present only when the file was inspected as an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FileMetadata {
    /// Stored path with the public root stripped, e.g. `/uploads/<name>`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub kind: String,
}

impl FileMetadata {
    pub fn plain(path: String) -> Self {
        Self {
            path,
            width: None,
            height: None,
            kind: None,
        }
    }

    pub fn with_image(path: String, image: ImageInfo) -> Self {
        Self {
            path,
            width: Some(image.width),
            height: Some(image.height),
            kind: Some(image.kind),
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind.is_some()
    }
}
