//! PostgreSQL Repository Implementation

use crate::domain::entities::User;
use crate::domain::repository::UserRepository;
use crate::error::UsersResult;
use sqlx::PgPool;

const LIST_USERS_SQL: &str = r#"
    SELECT
        id,
        name
    FROM users
    ORDER BY id
"#;

/// PostgreSQL-backed user repository
///
/// Borrows the process-wide pool handed over at construction; it never
/// opens or closes connections itself.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn list_users(&self) -> UsersResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(LIST_USERS_SQL)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "Users fetched");

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
        }
    }
}
