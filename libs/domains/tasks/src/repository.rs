use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaskResult;
use crate::models::{Task, TaskChanges};

/// Persistence for tasks
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: Task) -> TaskResult<Task>;

    async fn find_by_id(&self, id: ObjectId) -> TaskResult<Option<Task>>;

    /// Tasks of one event ordered by `time`, then creation
    async fn list_by_event(&self, event_id: ObjectId) -> TaskResult<Vec<Task>>;

    /// Set the supplied fields atomically; `None` when no task has `id`
    async fn update(
        &self,
        id: ObjectId,
        changes: TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> TaskResult<Option<Task>>;

    async fn delete(&self, id: ObjectId) -> TaskResult<bool>;
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<ObjectId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: ObjectId) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_by_event(&self, event_id: ObjectId) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(result)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> TaskResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.get_mut(&id).map(|task| {
            task.apply(&changes, updated_at);
            task.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.remove(&id).is_some())
    }
}
