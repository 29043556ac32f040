//! Error conversions - [`AppError`] into HTTP responses
//!
//! Feature-gated on `axum`.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    async fn problem_body(err: AppError) -> (u16, serde_json::Value) {
        let response = err.into_response();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_into_response_problem_body() {
        let (status, body) = problem_body(AppError::not_found("No route for /nonexistent")).await;

        assert_eq!(status, 404);
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["detail"], "No route for /nonexistent");
    }

    #[tokio::test]
    async fn test_method_not_allowed_problem_body() {
        let (status, body) =
            problem_body(AppError::method_not_allowed("DELETE is not allowed on /users")).await;

        assert_eq!(status, 405);
        assert_eq!(body["type"], "https://httpstatuses.io/405");
        assert_eq!(body["title"], "Method Not Allowed");
    }
}
