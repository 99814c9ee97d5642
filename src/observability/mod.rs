//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint (optional side port)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events for correlation
//! - Metrics updates are cheap and a no-op when the exporter is disabled

pub mod logging;
pub mod metrics;
