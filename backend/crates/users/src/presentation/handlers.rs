//! HTTP Handlers

use crate::application::UserService;
use crate::error::UsersResult;
use crate::presentation::dto::UserResponse;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

/// Shared state for user handlers
pub struct UsersAppState<S>
where
    S: UserService + Sync + 'static,
{
    pub service: Arc<S>,
}

impl<S> Clone for UsersAppState<S>
where
    S: UserService + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// GET /users
///
/// An empty table serializes as `[]`. Failures become a 500 with the error
/// text as body through `UsersError`'s `IntoResponse`.
pub async fn list_users<S>(
    State(state): State<UsersAppState<S>>,
) -> UsersResult<Json<Vec<UserResponse>>>
where
    S: UserService + Sync + 'static,
{
    let users = state.service.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
