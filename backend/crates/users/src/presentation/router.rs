//! Users Router

use crate::application::{ListUsersUseCase, UserService};
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, UsersAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the users router with PostgreSQL repository
pub fn users_router(repo: PgUserRepository) -> Router {
    users_router_generic(ListUsersUseCase::new(Arc::new(repo)))
}

/// Create a users router for any `UserService` implementation
pub fn users_router_generic<S>(service: S) -> Router
where
    S: UserService + Sync + 'static,
{
    let state = UsersAppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/users", get(handlers::list_users::<S>))
        .with_state(state)
}
