//! Response finalization.
//!
//! # Responsibilities
//! - Turn a ProxyOutcome into the client-facing response
//! - Serve the fixed local responses (ping, informational page, preflight)
//! - Keep failure bodies short: destination and reason for 502, a generic
//!   line for 500, never internal detail
//!
//! # Design Decisions
//! - Success responses hand the upstream body to hyper as a stream; once
//!   streaming has started a mid-body failure terminates the connection
//!   instead of attempting a second status line
//! - Hop-by-hop headers are already stripped by the forwarding engine

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::forward::ProxyOutcome;

/// Informational page served when no target is given.
const INFO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>forward-gateway</title></head>
<body>
<h1>Gateway is active</h1>
<p>Fetch a destination through the gateway by passing it in the
<code>url</code> query parameter:</p>
<pre>GET /?url=https://www.wikipedia.org</pre>
<p><code>GET /ping</code> answers with a liveness payload.</p>
</body>
</html>
"#;

/// Finalize a forward: status and rewritten headers from the upstream,
/// body streamed through.
pub fn finalize(outcome: ProxyOutcome) -> Response {
    match outcome {
        ProxyOutcome::Success(upstream) => {
            let (parts, incoming) = upstream.into_parts();
            Response::from_parts(parts, Body::new(incoming))
        }
        ProxyOutcome::UpstreamFailure { target, reason } => (
            StatusCode::BAD_GATEWAY,
            format!("could not reach {}: {}\n", target, reason),
        )
            .into_response(),
        ProxyOutcome::InternalFailure(reason) => {
            tracing::error!(reason = %reason, "Internal failure while forwarding");
            (StatusCode::INTERNAL_SERVER_ERROR, "gateway error\n").into_response()
        }
    }
}

/// 200 JSON liveness payload for `GET /ping`.
pub fn health_check() -> Response {
    let payload = json!({
        "status": "online",
        "message": "forward-gateway is accepting requests",
    });
    (
        [(header::CONTENT_TYPE, "application/json")],
        payload.to_string(),
    )
        .into_response()
}

/// 200 HTML usage page served when no target is given.
pub fn informational() -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], INFO_PAGE).into_response()
}

/// 204 empty response for CORS preflights.
pub fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// 400 response for a present but unparseable target.
pub fn bad_target(reason: &str) -> Response {
    (StatusCode::BAD_REQUEST, format!("{}\n", reason)).into_response()
}
