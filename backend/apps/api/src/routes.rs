//! Route composition
//!
//! `/health` and the feature routers, the JSON fallbacks, then the platform
//! middleware stack around all of it.

use axum::Router;
use axum::http::{Method, Uri};
use axum::routing::get;
use kernel::AppError;
use platform::{HttpTimeouts, apply_middleware};

/// Build the application router from the already-stateful users router.
pub fn build_router(users: Router, timeouts: HttpTimeouts) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .merge(users)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed);

    apply_middleware(router, timeouts)
}

/// GET /health
///
/// Liveness only; never touches the database.
async fn health() -> &'static str {
    "All good"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::method_not_allowed(format!("{} is not allowed on {}", method, uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;
    use users::{
        ListUsersUseCase, User, UserRepository, UserService, UsersError, UsersResult,
        users_router_generic,
    };

    #[derive(Clone)]
    enum StubService {
        Rows(Vec<User>),
        Fails(&'static str),
        Panics,
    }

    impl UserService for StubService {
        async fn list_users(&self) -> UsersResult<Vec<User>> {
            match self {
                StubService::Rows(users) => Ok(users.clone()),
                StubService::Fails(msg) => Err(UsersError::Internal(msg.to_string())),
                StubService::Panics => panic!("service blew up"),
            }
        }
    }

    /// Sets the flag when the query future is dropped before completing
    struct CancelGuard(Arc<AtomicBool>);

    impl Drop for CancelGuard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Repository whose query never finishes
    struct StallingRepository {
        cancelled: Arc<AtomicBool>,
    }

    impl UserRepository for StallingRepository {
        async fn list_users(&self) -> UsersResult<Vec<User>> {
            let _guard = CancelGuard(self.cancelled.clone());
            std::future::pending::<()>().await;
            Ok(Vec::new())
        }
    }

    fn app(service: StubService) -> Router {
        build_router(users_router_generic(service), HttpTimeouts::default())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_all_good() {
        let response = app(StubService::Rows(Vec::new()))
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "All good");
    }

    #[tokio::test]
    async fn test_health_does_not_touch_service() {
        for service in [StubService::Fails("db down"), StubService::Panics] {
            let response = app(service).oneshot(get_request("/health")).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, "All good");
        }
    }

    #[tokio::test]
    async fn test_users_through_full_stack() {
        let service = StubService::Rows(vec![User::new(1, "Ann"), User::new(2, "Bo")]);

        let response = app(service).oneshot(get_request("/users")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            body_string(response).await,
            r#"[{"id":1,"name":"Ann"},{"id":2,"name":"Bo"}]"#
        );
    }

    #[tokio::test]
    async fn test_users_empty_table() {
        let response = app(StubService::Rows(Vec::new()))
            .oneshot(get_request("/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_users_failure_is_500_with_stub_text() {
        let response = app(StubService::Fails("too many clients already"))
            .oneshot(get_request("/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "too many clients already");
    }

    #[tokio::test]
    async fn test_service_panic_is_recovered() {
        let router = app(StubService::Panics);

        let response = router.clone().oneshot(get_request("/users")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = router.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let response = app(StubService::Rows(Vec::new()))
            .oneshot(get_request("/nonexistent"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["detail"], "No route for /nonexistent");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/users")
            .body(Body::empty())
            .unwrap();

        let response = app(StubService::Rows(Vec::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_request_timeout_cancels_repository_query() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let repo = StallingRepository {
            cancelled: cancelled.clone(),
        };
        let users = users_router_generic(ListUsersUseCase::new(Arc::new(repo)));
        let timeouts = HttpTimeouts {
            request: Duration::from_millis(50),
            ..HttpTimeouts::default()
        };

        let response = build_router(users, timeouts)
            .oneshot(get_request("/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
