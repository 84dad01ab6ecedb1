//! MongoDB connector and helpers shared by the domain repositories

mod bounded;
mod config;
mod connector;
mod health;
pub mod id;
mod write_error;

pub use bounded::{DEFAULT_STORE_TIMEOUT, StoreTimeout, bounded};
pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health_detailed};
pub use id::{InvalidIdentifier, format_id, object_id_as_hex, parse_id, parse_ids};
pub use write_error::{DUPLICATE_KEY_CODE, is_duplicate_key};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database, bson::oid::ObjectId};
