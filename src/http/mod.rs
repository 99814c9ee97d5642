//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, gateway handler)
//!     → request.rs (request ID stamping)
//!     → middleware/cors.rs (headers on every response)
//!     → [routing classifies; forward/ executes]
//!     → response.rs (finalize outcome, fixed pages)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
