//! Request classification.
//!
//! # Responsibilities
//! - Classify each inbound request by method, path and query
//! - Extract and parse the `url` parameter into a forward target
//! - Return an explicit decision variant, never a silent default
//!
//! # Design Decisions
//! - Pure function of (method, path, query); no side effects, trivially testable
//! - OPTIONS wins over everything else so preflights never hit an upstream
//! - A present-but-unparseable target is a distinct `BadTarget` decision
//!   rather than falling through to the informational page; masking a
//!   client typo behind a 200 hides the error from the caller

use axum::http::Method;
use url::Url;

/// Reserved path answered locally with a liveness payload.
pub const HEALTH_PATH: &str = "/ping";

/// Query parameter naming the destination to fetch.
pub const TARGET_PARAM: &str = "url";

/// What to do with an inbound request. Computed once, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// CORS preflight; answered with 204 and no body.
    Preflight,
    /// `GET /ping`; answered with a fixed JSON payload.
    HealthCheck,
    /// No target given; answered with the usage page.
    Informational,
    /// A `url` parameter was given but is not an absolute URL.
    BadTarget(String),
    /// Forward to the parsed absolute target.
    Forward(Url),
}

/// Classify a request from its method, path and raw query string.
pub fn route(method: &Method, path: &str, query: Option<&str>) -> RouteDecision {
    if method == Method::OPTIONS {
        return RouteDecision::Preflight;
    }
    if path == HEALTH_PATH {
        return RouteDecision::HealthCheck;
    }

    let target = query.and_then(target_param).unwrap_or_default();
    if target.is_empty() {
        return RouteDecision::Informational;
    }

    match Url::parse(&target) {
        Ok(url) if url.has_host() => RouteDecision::Forward(url),
        Ok(_) => RouteDecision::BadTarget(format!("target has no host: {}", target)),
        Err(e) => RouteDecision::BadTarget(format!("invalid target URL: {}", e)),
    }
}

/// Extract the first `url` parameter from a raw query string.
fn target_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value.into_owned())
}
