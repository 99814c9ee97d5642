//! CORS header injection.
//!
//! Every response leaves the gateway with the same three CORS headers,
//! attached before any routing decision is acted on. Kept as an explicit
//! middleware step with a pure header-mutation function rather than
//! configuration on a shared proxy object.

use axum::body::Body;
use axum::http::header::HeaderMap;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, OPTIONS");
const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");

/// Attach the gateway's CORS headers, replacing any the upstream set.
pub fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", ALLOW_ORIGIN);
    headers.insert("access-control-allow-methods", ALLOW_METHODS);
    headers.insert("access-control-allow-headers", ALLOW_HEADERS);
}

/// Axum middleware applying [`add_cors_headers`] to every response.
pub async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    add_cors_headers(response.headers_mut());
    response
}
