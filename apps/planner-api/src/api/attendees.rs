//! Attendees API routes

use axum::Router;
use domain_attendees::{AttendeeService, MongoAttendeeRepository, handlers};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoAttendeeRepository::new(&state.db);
    let service = AttendeeService::new(repository)
        .with_store_timeout(state.config.store_timeout)
        .with_food_cost_policy(state.config.food_cost_policy);
    info!(policy = %service.food_cost_policy(), "Attendee food cost policy");
    handlers::router(service)
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoAttendeeRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create attendee indexes: {}", e))?;
    info!("Attendee collection indexes created");
    Ok(())
}
