//! Users Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, repository trait
//! - `application/` - The `UserService` capability and its use case
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! The only operation is listing every user. There are no writes, filters
//! or pagination; the table is owned by another system.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{ListUsersUseCase, UserService};
pub use domain::entities::User;
pub use domain::repository::UserRepository;
pub use error::{UsersError, UsersResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{users_router, users_router_generic};
