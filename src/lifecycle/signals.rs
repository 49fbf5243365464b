//! OS signal handling.

/// Wait for Ctrl+C (SIGINT).
///
/// If the handler cannot be installed this returns immediately, so the
/// caller proceeds straight to its shutdown path.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
    }
}
