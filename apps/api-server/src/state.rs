//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryRepository, PostRepository, UserRepository};
use quill_infra::DbErr;
use quill_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub max_page_size: u64,
}

impl AppState {
    /// Connect to the database and wire up the repositories.
    pub async fn init(config: &AppConfig) -> Result<Self, DbErr> {
        let connections = DatabaseConnections::init(&config.database).await?;
        let db = connections.main;

        tracing::info!("Application state initialized");

        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db)),
            max_page_size: config.max_page_size,
        })
    }
}
