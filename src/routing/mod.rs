//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request (method, path, query)
//!     → router.rs (pure classification)
//!     → RouteDecision {Preflight | HealthCheck | Informational | BadTarget | Forward}
//!     → acted on by the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Classification is pure and allocation-light; all I/O stays in http/
//! - The decision is computed exactly once per request

pub mod router;

pub use router::{route, RouteDecision, HEALTH_PATH, TARGET_PARAM};
