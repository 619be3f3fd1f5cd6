//! HTTP listener and shutdown handling.

use anyhow::Result;
use axum::Router;
use qrlink_core::Config;

/// Serve `app` on `0.0.0.0:SERVER_PORT` until a shutdown signal arrives.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Binding HTTP listener");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        backend = %config.storage_backend(),
        bucket = %config.bucket(),
        box_size = config.qr.box_size,
        border = config.qr.border,
        error_correction = %config.qr.error_correction,
        upload_timeout_secs = config.upload_timeout().as_secs(),
        "qrlink API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on the first of SIGINT or SIGTERM.
///
/// A listener that cannot be installed is logged and never fires, so the
/// other signal still stops the server.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal, "Draining in-flight requests before exit");

    crate::telemetry::shutdown_telemetry().await;
}
