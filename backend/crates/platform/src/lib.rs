//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the HTTP surface:
//! - Client identification (proxy-aware client IP resolution)
//! - The request middleware stack (request id, logging, panic recovery, timeouts)
//! - The connection-level server (header read and keep-alive idle bounds)
//! - Process shutdown signalling

pub mod client;
pub mod middleware;
pub mod server;
pub mod shutdown;

pub use client::ClientIp;
pub use middleware::{HttpTimeouts, apply_middleware};
pub use server::serve;
pub use shutdown::shutdown_signal;
