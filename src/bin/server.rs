//! Wallpaper server: static preview, render-only page and PNG export.
//!
//! Run with: cargo run --features server --bin lifegrid-server
//!
//! Requires Google Chrome or Chromium (or `CHROME_PATH`) for PNG export.

use std::net::SocketAddr;
use std::sync::Arc;

use lifegrid::render::{BrowserCapture, Capture};
use lifegrid::server::{router, AppState, Settings};
use lifegrid::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // RUST_LOG support, info by default
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()?;
    tracing::info!(
        "Serving {} with timezone {}, rendering via {}",
        settings.static_root.display(),
        settings.timezone,
        settings.render_base_url
    );

    let capture = Arc::new(BrowserCapture::new(settings.capture_config()));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let app = router(Arc::new(AppState::new(settings, capture.clone())));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Io(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("Wallpaper server running at http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Io(format!("Server error: {}", e)));

    // The browser is closed even if serving failed.
    let closer = Arc::clone(&capture);
    if let Err(e) = tokio::task::spawn_blocking(move || closer.close()).await {
        tracing::warn!("Failed to close browser: {}", e);
    }
    tracing::info!("Server stopped");
    served
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
