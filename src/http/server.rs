//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware (CORS, request ID, tracing)
//! - Classify every inbound request via the routing engine
//! - Answer control and informational requests locally
//! - Hand Forward decisions to the forwarding engine and finalize the outcome
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::forward::{ForwardEngine, ForwardError, ProxyOutcome};
use crate::http::middleware::cors_middleware;
use crate::http::request::{self, RequestIdLayer};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{route, RouteDecision};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ForwardEngine>,
    pub max_request_body_bytes: usize,
}

/// HTTP server for the forward-proxy gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the outbound client cannot be constructed (no usable
    /// root certificate store).
    pub fn new(config: &GatewayConfig) -> Result<Self, ForwardError> {
        let engine = Arc::new(ForwardEngine::new(&config.timeouts, &config.forwarding)?);

        let state = AppState {
            engine,
            max_request_body_bytes: config.forwarding.max_request_body_bytes,
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware::from_fn(cors_middleware))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main gateway handler: classify, then answer locally or forward.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request::request_id(&request).to_string();
    let method = request.method().clone();
    let method_str = method.to_string();

    let decision = route(&method, request.uri().path(), request.uri().query());

    match decision {
        RouteDecision::Preflight => {
            let response = response::preflight();
            metrics::record_request(&method_str, response.status().as_u16(), "preflight", start_time);
            response
        }
        RouteDecision::HealthCheck => {
            let response = response::health_check();
            metrics::record_request(&method_str, response.status().as_u16(), "health", start_time);
            response
        }
        RouteDecision::Informational => {
            let response = response::informational();
            metrics::record_request(&method_str, response.status().as_u16(), "info", start_time);
            response
        }
        RouteDecision::BadTarget(reason) => {
            tracing::warn!(request_id = %request_id, reason = %reason, "Rejecting malformed target");
            let response = response::bad_target(&reason);
            metrics::record_request(&method_str, response.status().as_u16(), "bad_target", start_time);
            response
        }
        RouteDecision::Forward(target) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                target = %target,
                "Forwarding request"
            );

            let (parts, body) = request.into_parts();

            // Buffered so redirect hops can replay it
            let body_bytes = match axum::body::to_bytes(body, state.max_request_body_bytes).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
                    let response =
                        response::finalize(ProxyOutcome::InternalFailure(format!(
                            "request body unreadable: {}",
                            e
                        )));
                    metrics::record_request(&method_str, response.status().as_u16(), "forward", start_time);
                    return response;
                }
            };

            let outcome = state
                .engine
                .forward(method, &parts.headers, body_bytes, target)
                .await;

            if let ProxyOutcome::UpstreamFailure { target, reason } = &outcome {
                tracing::warn!(
                    request_id = %request_id,
                    target = %target,
                    reason = %reason,
                    "Upstream failure"
                );
            }

            let response = response::finalize(outcome);
            metrics::record_request(&method_str, response.status().as_u16(), "forward", start_time);
            response
        }
    }
}
