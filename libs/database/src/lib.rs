//! Document store plumbing for the event planner
//!
//! Connection management, identifier coercion and bounded round-trips for MongoDB.
//!
//! # Features
//!
//! - `config` (default) - load [`mongodb::MongoConfig`] through `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig, parse_id};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "event-planner");
//! let client = mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//!
//! let id = parse_id("65f1c0a2b3d4e5f601234567")?;
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
