//! Single-hop HTTP forward-proxy gateway library.
//!
//! A client names a destination in the `url` query parameter; the gateway
//! fetches it and streams the response back with CORS headers so a browser
//! front end can consume it cross-origin.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use forward::{ForwardEngine, ProxyOutcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteDecision;
