//! The forwarding engine: outbound fetch, redirect following, rewriting.
//!
//! # Responsibilities
//! - Mirror the inbound request to the target over a pooled client
//! - Follow redirect chains up to a bounded hop count
//! - Rewrite response headers so the result is attributable to the gateway
//! - Map every failure to an explicit `ProxyOutcome` variant
//!
//! # Design Decisions
//! - One pooled client shared by all requests; hyper's legacy pool keys
//!   connections by scheme + host:port and handles checkout/return under
//!   concurrent access
//! - The target scheme is not allow-listed: anything `url` parses to with a
//!   host is fetched (open proxy semantics, deliberate)
//! - A single forward chain per inbound request; no retries
//! - Exhausting the hop budget returns the last response as the outcome
//!   instead of erroring

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use url::Url;

use crate::config::{ForwardingConfig, TimeoutConfig};
use crate::forward::headers;

/// Failures internal to a single forward attempt.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The outbound request could not be constructed.
    #[error("could not build outbound request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    /// The transport failed: DNS, connect, TLS or mid-exchange I/O.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The upstream did not produce response headers in time.
    #[error("timed out after {0:?} waiting for upstream response headers")]
    Timeout(Duration),

    /// No usable root CA store was found at engine construction.
    #[error("could not load native root certificates: {0}")]
    Roots(std::io::Error),
}

/// Result of a forward attempt, consumed by response finalization.
#[derive(Debug)]
pub enum ProxyOutcome {
    /// Final upstream response, headers already rewritten, body streaming.
    Success(Response<Incoming>),
    /// The upstream could not be reached or did not answer in time.
    UpstreamFailure { target: Url, reason: String },
    /// A gateway-side failure before or during request construction.
    InternalFailure(String),
}

/// Executes forwards over a shared, pooled outbound client.
pub struct ForwardEngine {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    max_redirects: u32,
    response_timeout: Duration,
}

impl ForwardEngine {
    /// Build the engine and its connection pool from configuration.
    pub fn new(timeouts: &TimeoutConfig, forwarding: &ForwardingConfig) -> Result<Self, ForwardError> {
        let mut http = HttpConnector::new();
        http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        http.enforce_http(false);

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(ForwardError::Roots)?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(forwarding.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .build(connector);

        Ok(Self {
            client,
            max_redirects: forwarding.max_redirects,
            response_timeout: Duration::from_secs(timeouts.response_secs),
        })
    }

    /// Forward an inbound request to `target`, following redirects.
    ///
    /// The body is pre-buffered by the caller so it can be replayed on
    /// each redirect hop. Invoked only for `Forward` route decisions.
    pub async fn forward(
        &self,
        method: Method,
        inbound_headers: &HeaderMap,
        body: Bytes,
        target: Url,
    ) -> ProxyOutcome {
        let mut current = target;
        let mut current_method = method;
        let mut replay_body = body;
        let mut hops = 0u32;

        loop {
            let response = match self
                .send_once(&current_method, inbound_headers, replay_body.clone(), &current)
                .await
            {
                Ok(response) => response,
                Err(ForwardError::BuildRequest(e)) => {
                    return ProxyOutcome::InternalFailure(format!("request construction: {}", e));
                }
                Err(e @ (ForwardError::Transport(_) | ForwardError::Timeout(_))) => {
                    return ProxyOutcome::UpstreamFailure {
                        target: current,
                        reason: e.to_string(),
                    };
                }
                Err(e) => return ProxyOutcome::InternalFailure(e.to_string()),
            };

            if response.status().is_redirection() && hops < self.max_redirects {
                if let Some(next) = redirect_target(response.headers(), &current) {
                    hops += 1;
                    tracing::debug!(
                        from = %current,
                        to = %next,
                        hop = hops,
                        status = %response.status(),
                        "Following redirect"
                    );
                    if downgrade_to_get(response.status(), &current_method) {
                        current_method = Method::GET;
                        replay_body = Bytes::new();
                    }
                    current = next;
                    continue;
                }
            }

            let (mut parts, incoming) = response.into_parts();
            headers::rewrite_response_headers(&mut parts.headers, &current);
            return ProxyOutcome::Success(Response::from_parts(parts, incoming));
        }
    }

    /// Issue a single outbound request, no redirect handling.
    async fn send_once(
        &self,
        method: &Method,
        inbound_headers: &HeaderMap,
        body: Bytes,
        target: &Url,
    ) -> Result<Response<Incoming>, ForwardError> {
        let uri: Uri = target.as_str().parse().map_err(axum::http::Error::from)?;

        let mut request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::from(body))?;
        *request.headers_mut() = headers::outbound_headers(inbound_headers, target);

        match tokio::time::timeout(self.response_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ForwardError::Transport(error_chain(&e))),
            Err(_) => Err(ForwardError::Timeout(self.response_timeout)),
        }
    }
}

/// Resolve the redirect destination from a 3xx response, if any.
fn redirect_target(headers: &HeaderMap, current: &Url) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    match Url::parse(location) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => current.join(location).ok(),
        Err(_) => None,
    }
}

/// 303 always replays as GET; 301/302 do too for non-idempotent methods,
/// matching what browsers and mainstream clients do.
fn downgrade_to_get(status: StatusCode, method: &Method) -> bool {
    matches!(
        status,
        StatusCode::SEE_OTHER | StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND
    ) && method != Method::GET
        && method != Method::HEAD
}

/// Flatten an error and its sources into one readable line.
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
