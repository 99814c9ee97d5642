//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Only interrupt (ctrl-c / SIGINT) is wired; the gateway holds no state
//!   worth a reload signal

/// Wait for the process interrupt signal.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install interrupt handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
