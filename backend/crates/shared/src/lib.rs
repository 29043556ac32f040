//! Shared Kernel - Cross-crate error vocabulary
//!
//! This crate holds the pieces every other crate agrees on:
//! - [`error::kind::ErrorKind`] classifying failures by HTTP status
//! - [`error::app_error::AppError`], the error the HTTP fallbacks return
//! - (feature `axum`) rendering into an RFC 7807 problem response
//!
//! Feature crates keep their own error enums and reuse [`ErrorKind`] for
//! their status mapping.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}

pub use error::app_error::AppError;
pub use error::kind::ErrorKind;
