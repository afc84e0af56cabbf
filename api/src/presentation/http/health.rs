use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::bootstrap::app_context::AppContext;

pub const READY_MESSAGE: &str = "Api server ready!";

/// Shape of a MySQL `DATETIME` once serialized for clients.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub async fn ready() -> &'static str {
    READY_MESSAGE
}

/// GET /ping
/// Rows of `SELECT NOW()`, keyed by column name.
pub async fn ping(State(ctx): State<AppContext>) -> Response {
    match ctx.database_clock().now().await {
        Ok(now) => {
            let rows = json!([{ "NOW()": now.format(TIMESTAMP_FORMAT).to_string() }]);
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = ?e, "database_ping_failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(ready))
        .route("/ping", get(ping))
        .with_state(ctx)
}
