use axum::{Router, routing::get};

pub const READY_MESSAGE: &str = "Media server ready!";

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Readiness string", body = String, content_type = "text/plain"))
)]
pub async fn ready() -> &'static str {
    READY_MESSAGE
}

pub fn routes() -> Router {
    Router::new().route("/", get(ready))
}
