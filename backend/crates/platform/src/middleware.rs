//! HTTP middleware stack
//!
//! Layers applied around every route, outermost first:
//! 1. request id (`x-request-id`, generated if absent, echoed on the response)
//! 2. client IP resolution ([`ClientIp`] extension)
//! 3. request/response tracing (method, path, status, latency)
//! 4. panic recovery (500, process keeps serving)
//! 5. response body write timeout
//! 6. per-request handling timeout (504, in-flight future is dropped)
//! 7. request body read timeout

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, ResponseBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::client::{ClientIp, resolve_client_ip};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Server-side time bounds
///
/// `read` and `idle` are enforced per connection by [`crate::server::serve`];
/// `read`, `write` and `request` by [`apply_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Bound on reading the request head, and separately the request body
    pub read: Duration,
    /// Bound on writing the response body
    pub write: Duration,
    /// Bound on the whole handler execution
    pub request: Duration,
    /// Quiet period after which a keep-alive connection is closed
    pub idle: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(30),
            request: Duration::from_secs(60),
            idle: Duration::from_secs(60),
        }
    }
}

/// Wrap `router` with the full middleware stack.
///
/// Apply this last, after every route and the fallback have been added, so
/// that unmatched requests are logged and identified too.
pub fn apply_middleware(router: Router, timeouts: HttpTimeouts) -> Router {
    tracing::debug!(
        read_secs = timeouts.read.as_secs_f64(),
        write_secs = timeouts.write.as_secs_f64(),
        request_secs = timeouts.request.as_secs_f64(),
        "Applying HTTP middleware stack"
    );

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(axum::middleware::from_fn(resolve_client_ip))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_request_span)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    )
                    .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
            )
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(ResponseBodyTimeoutLayer::new(timeouts.write))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                timeouts.request,
            ))
            .layer(RequestBodyTimeoutLayer::new(timeouts.read)),
    )
}

fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    let client_ip = request
        .extensions()
        .get::<ClientIp>()
        .map(|ip| ip.0.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        client_ip = %client_ip,
    )
}

/// Response written when a handler panics
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Handler panicked, request recovered");

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
