//! API routes module
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod attendees;
pub mod events;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .nest("/attendees", attendees::router(state))
        .nest("/tasks", tasks::router(state))
        .merge(health::router(state.clone()))
}

/// Create the indexes every collection relies on
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    events::init_indexes(db).await?;
    attendees::init_indexes(db).await?;
    tasks::init_indexes(db).await?;
    Ok(())
}
