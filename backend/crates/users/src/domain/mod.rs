//! Domain Layer - Entities and repository traits
//!
//! This layer contains:
//! - The `User` entity
//! - The `UserRepository` trait (implemented in `infra/`)

pub mod entities;
pub mod repository;
