//! Application Layer - Use Cases
//!
//! `UserService` is the capability the HTTP layer depends on.
//! `ListUsersUseCase` is its production implementation over a repository.

pub mod list_users;

pub use list_users::ListUsersUseCase;

use crate::domain::entities::User;
use crate::error::UsersResult;

/// User listing capability consumed by the handlers
#[trait_variant::make(UserService: Send)]
pub trait LocalUserService {
    async fn list_users(&self) -> UsersResult<Vec<User>>;
}
