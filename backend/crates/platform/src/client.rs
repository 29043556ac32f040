//! Client identification utilities
//!
//! Resolves the originating client address, taking reverse proxies into account.

use axum::extract::{ConnectInfo, Request};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::net::{IpAddr, SocketAddr};

/// Single-value headers set by proxies, checked in order before `X-Forwarded-For`.
const SINGLE_IP_HEADERS: [&str; 2] = ["true-client-ip", "x-real-ip"];

/// Resolved client address, stored as a request extension by [`resolve_client_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Extract client IP address from headers
///
/// Checks `True-Client-IP`, then `X-Real-IP`, then the first entry of
/// `X-Forwarded-For`, and finally falls back to the direct connection IP.
/// Unparsable header values are skipped.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    SINGLE_IP_HEADERS
        .iter()
        .find_map(|name| header_ip(headers, name))
        .or_else(|| forwarded_for_ip(headers))
        .or(direct_ip)
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn forwarded_for_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse().ok())
}

/// Middleware that attaches a [`ClientIp`] extension to the request
///
/// The peer address comes from `ConnectInfo<SocketAddr>`, which
/// [`crate::server::serve`] attaches to every request; without it only the
/// proxy headers are consulted.
pub async fn resolve_client_ip(mut req: Request, next: Next) -> Response {
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    if let Some(ip) = extract_client_ip(req.headers(), direct_ip) {
        req.extensions_mut().insert(ClientIp(ip));
    }

    next.run(req).await
}
