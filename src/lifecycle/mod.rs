//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init observability → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (bind failure included) is fatal
//! - Shutdown drains via axum's graceful-shutdown hook

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
