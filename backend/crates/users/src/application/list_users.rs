//! List Users Use Case

use crate::application::UserService;
use crate::domain::entities::User;
use crate::domain::repository::UserRepository;
use crate::error::UsersResult;
use std::sync::Arc;

/// Pass-through from the service capability to a repository
pub struct ListUsersUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

impl<R> Clone for ListUsersUseCase<R>
where
    R: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: self.user_repo.clone(),
        }
    }
}

impl<R> UserService for ListUsersUseCase<R>
where
    R: UserRepository + Sync,
{
    async fn list_users(&self) -> UsersResult<Vec<User>> {
        self.user_repo.list_users().await
    }
}
