//! OS signal handling.

/// Wait for a shutdown signal (ctrl-c, or SIGTERM on unix).
///
/// Used as the graceful-shutdown future for `axum::serve`; the listener
/// stops accepting and in-flight requests drain. An aborted client
/// request drops its handler future, which abandons any in-progress
/// readiness polling and forward.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
