//! Tasks API routes

use axum::Router;
use domain_tasks::{MongoTaskRepository, TaskService, handlers};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoTaskRepository::new(&state.db);
    let service = TaskService::new(repository).with_store_timeout(state.config.store_timeout);
    handlers::router(service)
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoTaskRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create task indexes: {}", e))?;
    info!("Task collection indexes created");
    Ok(())
}
