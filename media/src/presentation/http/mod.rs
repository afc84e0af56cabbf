use axum::Router;
use axum::extract::{DefaultBodyLimit, MatchedPath};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;

pub mod files;
pub mod health;
pub mod openapi;

/// Full media router: API routes first, then static files of the public root.
pub fn router(ctx: AppContext) -> Router {
    let cfg = ctx.cfg.clone();
    Router::new()
        .merge(health::routes())
        .merge(openapi::routes())
        .merge(files::routes(ctx))
        .fallback_service(ServeDir::new(&cfg.public_path))
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(cfg.max_request_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::DELETE,
        http::Method::OPTIONS,
    ];
    let origin = cfg
        .cors_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok())
        .map(AllowOrigin::exact)
        .unwrap_or_else(AllowOrigin::mirror_request);
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers([http::header::CONTENT_TYPE])
}
