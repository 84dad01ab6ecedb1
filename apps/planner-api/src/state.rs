//! Application state shared by the route builders.

use mongodb::{Client, Database};

/// Cloned into each router; the client shares one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
