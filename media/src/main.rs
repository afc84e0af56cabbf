use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::{info, warn};

use media::bootstrap::app_context::{AppContext, AppServices};
use media::bootstrap::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "media=debug,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting media server");

    let services = AppServices::from_config(&cfg);
    let ctx = AppContext::new(cfg.clone(), services);

    // Storage directories are created once, before accepting requests.
    if let Err(e) = ctx.storage_port().ensure_root_exists().await {
        warn!(error = ?e, public_path = %cfg.public_path, upload_path = %cfg.upload_path, "Failed to create storage dirs");
    }

    let app = media::presentation::http::router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.internal_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Media server listening");
    if let Some(port) = cfg.external_port {
        info!(external_url = %format!("http://localhost:{port}"), "External port");
    }
    info!(public_path = %cfg.public_path, "Serving public path");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Media server stopped");
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
