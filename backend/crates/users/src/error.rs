//! Users Error Types
//!
//! Every failure in this crate is a server fault: the data layer has no
//! "not found" or "conflict" outcome for a full-table listing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::kind::ErrorKind;
use thiserror::Error;

/// Users-specific result type alias
pub type UsersResult<T> = Result<T, UsersError>;

#[derive(Debug, Error)]
pub enum UsersError {
    /// Query failed, connection lost, or row shape did not match
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Failure raised by a non-database `UserService` implementation
    #[error("{0}")]
    Internal(String),
}

impl UsersError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersError::Database(_) | UsersError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            UsersError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UsersError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
        }
    }
}

/// 500 with the failure description, unmodified, as the plain-text body
impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        self.log();
        (self.status_code(), self.to_string()).into_response()
    }
}
