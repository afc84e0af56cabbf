use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::health::ready,
        crate::presentation::http::files::upload_files,
        crate::presentation::http::files::get_metadata,
        crate::presentation::http::files::delete_file,
    ),
    components(schemas(
        crate::domain::media::metadata::FileMetadata,
        crate::presentation::http::files::ErrorResponse,
        crate::presentation::http::files::MessageResponse,
        crate::presentation::http::files::MetadataResponse,
        crate::presentation::http::files::UploadedFileInfo,
        crate::presentation::http::files::UploadItemResponse,
        crate::presentation::http::files::UploadFilesMultipart,
    )),
    tags(
        (name = "Media", description = "Upload, describe and delete stored files"),
        (name = "Health", description = "Readiness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn routes() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}
