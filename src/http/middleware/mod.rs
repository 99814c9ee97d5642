//! Gateway middleware.

pub mod cors;

pub use cors::{add_cors_headers, cors_middleware};
