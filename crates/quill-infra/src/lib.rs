//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! the Postgres persistence layer (SeaORM) and the JWT/Argon2
//! authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConnections;

// Re-exported so the server can name connection errors without depending
// on sea-orm directly.
pub use sea_orm::DbErr;
