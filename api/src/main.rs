use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

use api::bootstrap::app_context::AppContext;
use api::bootstrap::config::Config;
use api::infrastructure::db::{MySqlClock, lazy_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "api=debug,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting api server");

    let pool = lazy_pool(&cfg);
    let ctx = AppContext::new(cfg.clone(), Arc::new(MySqlClock::new(pool.clone())));
    let app = api::presentation::http::router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.internal_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Api server listening");
    if let Some(port) = cfg.external_port {
        info!(external_url = %format!("http://localhost:{port}"), "External port");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    pool.close().await;
    info!("Api server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
