//! OS signal handling.

/// Resolve once Ctrl+C is received.
///
/// If the handler cannot be installed the future never resolves, so the
/// run proceeds without interrupt support.
pub async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
