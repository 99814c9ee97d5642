//! Structured logging setup.
//!
//! # Responsibilities
//! - Install the tracing subscriber once, at startup
//! - Respect `RUST_LOG`, with a sensible default filter otherwise

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Safe to call only once; subsequent calls are ignored (relevant for
/// tests that spin up the server in the same process).
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forward_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
