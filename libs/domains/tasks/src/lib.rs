//! Tasks Domain
//!
//! Scheduled to-dos attached to an event, listed in `HH:MM` order.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{CreateTask, NewTask, Task, TaskChanges, UpdateTask};
pub use mongodb::MongoTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
