//! Data Transfer Objects

use serde::Serialize;

use crate::domain::entities::User;

/// One element of the `GET /users` response array
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}
