//! Task Service - Business logic layer

use chrono::Utc;
use database::mongodb::{DEFAULT_STORE_TIMEOUT, ObjectId, bounded, parse_id};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, UpdateTask};
use crate::repository::TaskRepository;

/// Task service providing business logic operations
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    store_timeout: Duration,
}

fn parse_event_id(raw: Option<&str>) -> TaskResult<ObjectId> {
    match raw.map(str::trim) {
        None | Some("") => Err(TaskError::Validation("eventId is required".into())),
        Some(raw) => parse_id(raw).map_err(|_| TaskError::Validation("invalid eventId".into())),
    }
}

fn parse_task_id(raw: &str) -> TaskResult<ObjectId> {
    parse_id(raw).map_err(|_| TaskError::InvalidId)
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Tasks of one event, earliest time first
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, event_id: Option<&str>) -> TaskResult<Vec<Task>> {
        let event_id = parse_event_id(event_id)?;
        bounded(self.store_timeout, self.repository.list_by_event(event_id)).await?
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, id: &str) -> TaskResult<Task> {
        let id = parse_task_id(id)?;
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await??
            .ok_or(TaskError::NotFound)
    }

    #[instrument(skip(self, input), fields(event_id = %input.event_id))]
    pub async fn add_task(&self, input: CreateTask) -> TaskResult<Task> {
        input.validate()?;
        let event_id = parse_event_id(Some(&input.event_id))?;

        let task = Task::new(input.into_new(event_id), Utc::now());
        let task = bounded(self.store_timeout, self.repository.insert(task)).await??;

        info!(task_id = %task.id, event_id = %task.event_id, "task added");
        Ok(task)
    }

    /// Set only the supplied fields of one task
    #[instrument(skip(self, update), fields(task_id = %update.id))]
    pub async fn update_task(&self, update: UpdateTask) -> TaskResult<Task> {
        update.validate()?;
        let id = parse_task_id(&update.id)?;

        let changes = update.changes();
        if changes.is_empty() {
            return Err(TaskError::Validation("no fields to update".into()));
        }

        let task = bounded(
            self.store_timeout,
            self.repository.update(id, changes, Utc::now()),
        )
        .await??
        .ok_or(TaskError::NotFound)?;

        info!(task_id = %task.id, "task updated");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> TaskResult<()> {
        let id = parse_task_id(id)?;
        if !bounded(self.store_timeout, self.repository.delete(id)).await?? {
            return Err(TaskError::NotFound);
        }

        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            store_timeout: self.store_timeout,
        }
    }
}
