//! Attendees Domain
//!
//! People registered for an event, with per-attendee food costs.
//!
//! - Emails are normalized and unique across all attendees
//! - `PUT /attendees` accepts a single partial update or a bulk food cost update
//! - New attendees without a `foodCost` get one from [`FoodCostPolicy`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_attendees::{FoodCostPolicy, handlers, mongodb::MongoAttendeeRepository, service::AttendeeService};
//!
//! # async fn example(db: database::mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let repository = MongoAttendeeRepository::new(&db);
//! repository.create_indexes().await?;
//!
//! let service = AttendeeService::new(repository).with_food_cost_policy(FoodCostPolicy::InheritEvent);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{AttendeeError, AttendeeResult};
pub use handlers::ApiDoc;
pub use models::{
    Attendee, AttendeeChanges, AttendeePatch, AttendeePutOutcome, AttendeePutRequest,
    BulkUpdateResult, CreateAttendee, FoodCostPolicy, FoodCostSummary, NewAttendee,
};
pub use mongodb::MongoAttendeeRepository;
pub use repository::{AttendeeRepository, InMemoryAttendeeRepository};
pub use service::AttendeeService;
