//! Forwarding engine subsystem.
//!
//! # Data Flow
//! ```text
//! Forward(target) decision
//!     → engine.rs (outbound request over pooled client)
//!     → redirect loop (bounded hops, Location resolution)
//!     → headers.rs (hop-by-hop strip, origin rewrite)
//!     → ProxyOutcome {Success | UpstreamFailure | InternalFailure}
//!     → response finalization in the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Failures are data, not callbacks: every path ends in a ProxyOutcome
//! - The pool is the only state shared across requests

pub mod engine;
pub mod headers;

pub use engine::{ForwardEngine, ForwardError, ProxyOutcome};
