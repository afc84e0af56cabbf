use axum::{
    Json, Router,
    extract::{Multipart, Path as AxumPath, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::files::delete_file::DeleteStoredFile;
use crate::application::use_cases::files::describe_file::DescribeStoredFile;
use crate::application::use_cases::files::upload_files::{
    AttachmentInfo, IngestUploads, IngestionOutcome, IngestionResult,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::media::errors::ValidationError;
use crate::domain::media::extension_policy::base_name;
use crate::domain::media::metadata::FileMetadata;
use crate::domain::media::upload::UploadedFile;

/// Multipart field that carries attachments.
pub const FILES_FIELD: &str = "files";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetadataResponse {
    pub success: bool,
    pub metadata: FileMetadata,
}

/// Client-side view of one attachment.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedFileInfo {
    pub fieldname: String,
    pub originalname: String,
    pub mimetype: Option<String>,
    pub size: u64,
    /// Stored name, present once the file was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadItemResponse {
    pub success: bool,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when the file was written even though the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<bool>,
    pub file: UploadedFileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFilesMultipart {
    /// File to upload; repeat the field for several files
    #[schema(value_type = String, format = Binary)]
    files: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum UploadRequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unexpected field")]
    UnexpectedField(String),
    #[error("File too large")]
    TooLarge,
    #[error("{0}")]
    Multipart(String),
}

impl IntoResponse for UploadRequestError {
    fn into_response(self) -> Response {
        bad_request(self.to_string())
    }
}

fn bad_request(error: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
        .into_response()
}

fn file_info(attachment: AttachmentInfo, stored: Option<(String, String)>) -> UploadedFileInfo {
    let (filename, path) = match stored {
        Some((name, path)) => (Some(name), Some(path)),
        None => (None, None),
    };
    UploadedFileInfo {
        fieldname: attachment.field_name,
        originalname: attachment.original_name,
        mimetype: attachment.content_type,
        size: attachment.size,
        filename,
        path,
    }
}

impl From<IngestionResult> for UploadItemResponse {
    fn from(result: IngestionResult) -> Self {
        let stored = result
            .stored_file()
            .map(|f| (f.stored_name.clone(), f.relative_path.clone()));
        let file = file_info(result.attachment, stored);
        match result.outcome {
            IngestionOutcome::Stored { metadata, .. } => Self {
                success: true,
                status: StatusCode::OK.as_u16(),
                message: None,
                stored: None,
                file,
                metadata: Some(metadata),
            },
            IngestionOutcome::Rejected { reason } => Self {
                success: false,
                status: StatusCode::BAD_REQUEST.as_u16(),
                message: Some(reason.to_string()),
                stored: None,
                file,
                metadata: None,
            },
            IngestionOutcome::WriteFailed { error } => Self {
                success: false,
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: Some(error.to_string()),
                stored: None,
                file,
                metadata: None,
            },
            IngestionOutcome::StoredButUndescribed { error, .. } => Self {
                success: false,
                status: StatusCode::BAD_REQUEST.as_u16(),
                message: Some(error.to_string()),
                stored: Some(true),
                file,
                metadata: None,
            },
        }
    }
}

/// Buffers every file part of the request. Text parts are ignored; file
/// parts under any field other than `files` fail the whole request.
pub async fn read_attachments(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Vec<UploadedFile>, UploadRequestError> {
    let mut attachments = Vec::new();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadRequestError::Multipart(e.body_text()))?
    {
        let Some(original_name) = field.file_name().map(|s| base_name(s).to_string()) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != FILES_FIELD {
            return Err(UploadRequestError::UnexpectedField(field_name));
        }
        let content_type = field.content_type().map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| UploadRequestError::Multipart(e.body_text()))?
        {
            if bytes.len() + chunk.len() > max_bytes {
                tracing::info!(original_name = %original_name, max_bytes, "upload_too_large");
                return Err(UploadRequestError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        // Browsers send an empty, nameless part when no file was picked.
        if original_name.is_empty() && bytes.is_empty() {
            continue;
        }
        attachments.push(UploadedFile::new(field_name, original_name, content_type, bytes));
    }
    Ok(attachments)
}

/// POST /upload (multipart/form-data)
/// Fields:
/// - files: zero or more binary files
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Media",
    request_body(
        content = UploadFilesMultipart,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "One result per attachment, in upload order", body = [UploadItemResponse]),
        (status = 400, description = "No usable attachment", body = ErrorResponse)
    )
)]
pub async fn upload_files(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A request without a multipart body carries no attachments.
    let Ok(mut multipart) = multipart else {
        return UploadRequestError::from(ValidationError::NoFileAttached).into_response();
    };
    let attachments = match read_attachments(&mut multipart, ctx.cfg.upload_max_bytes).await {
        Ok(attachments) => attachments,
        Err(err) => return err.into_response(),
    };

    let storage = ctx.storage_port();
    let extractor = ctx.metadata_extractor();
    let uc = IngestUploads {
        storage: storage.as_ref(),
        extractor: extractor.as_ref(),
    };
    let results = match uc.execute(attachments).await {
        Ok(results) => results,
        Err(err) => return UploadRequestError::from(err).into_response(),
    };

    // Nothing passed validation, so nothing was written.
    if let Some(reason) = results
        .iter()
        .map(IngestionResult::rejection)
        .collect::<Option<Vec<_>>>()
        .and_then(|reasons| reasons.first().map(|r| r.to_string()))
    {
        return bad_request(reason);
    }

    let stored = results.iter().filter(|r| r.stored_file().is_some()).count();
    tracing::info!(attachments = results.len(), stored, "upload_processed");
    let body: Vec<UploadItemResponse> = results.into_iter().map(Into::into).collect();
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /metadata/{filename}
#[utoipa::path(
    get,
    path = "/metadata/{filename}",
    tag = "Media",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Metadata of the stored file", body = MetadataResponse),
        (status = 404, description = "Invalid name, missing file or unreadable metadata", body = MessageResponse)
    )
)]
pub async fn get_metadata(
    State(ctx): State<AppContext>,
    AxumPath(filename): AxumPath<String>,
) -> Response {
    let storage = ctx.storage_port();
    let extractor = ctx.metadata_extractor();
    let uc = DescribeStoredFile {
        storage: storage.as_ref(),
        extractor: extractor.as_ref(),
    };
    match uc.execute(&filename).await {
        Ok(metadata) => (
            StatusCode::OK,
            Json(MetadataResponse {
                success: true,
                metadata,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::debug!(error = %err, filename = %filename, "metadata_lookup_failed");
            (
                StatusCode::NOT_FOUND,
                Json(MessageResponse {
                    success: false,
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /file/{filename}
/// Logical failures are reported in the body with HTTP 200.
#[utoipa::path(
    delete,
    path = "/file/{filename}",
    tag = "Media",
    params(("filename" = String, Path, description = "Stored file name")),
    responses((status = 200, description = "Deletion outcome", body = MessageResponse))
)]
pub async fn delete_file(
    State(ctx): State<AppContext>,
    AxumPath(filename): AxumPath<String>,
) -> Json<MessageResponse> {
    let storage = ctx.storage_port();
    let uc = DeleteStoredFile {
        storage: storage.as_ref(),
    };
    match uc.execute(&filename).await {
        Ok(()) => Json(MessageResponse {
            success: true,
            message: "File deleted successfully".into(),
        }),
        Err(err) => Json(MessageResponse {
            success: false,
            message: err.to_string(),
        }),
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/upload", post(upload_files))
        .route("/metadata/:filename", get(get_metadata))
        .route("/file/:filename", delete(delete_file))
        .with_state(ctx)
}
