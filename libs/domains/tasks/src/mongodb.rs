//! MongoDB implementation of TaskRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::TaskResult;
use crate::models::{Task, TaskChanges};
use crate::repository::TaskRepository;

pub const COLLECTION: &str = "tasks";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    event_id: ObjectId,
    #[serde(rename = "task_name")]
    task_name: String,
    detail: String,
    time: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl From<&Task> for TaskDocument {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id,
            event_id: t.event_id,
            task_name: t.task_name.clone(),
            detail: t.detail.clone(),
            time: t.time.clone(),
            created_at: to_bson_datetime(t.created_at),
            updated_at: to_bson_datetime(t.updated_at),
        }
    }
}

impl From<TaskDocument> for Task {
    fn from(doc: TaskDocument) -> Self {
        Self {
            id: doc.id,
            event_id: doc.event_id,
            task_name: doc.task_name,
            detail: doc.detail,
            time: doc.time,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// MongoDB-backed task repository
#[derive(Clone)]
pub struct MongoTaskRepository {
    collection: Collection<TaskDocument>,
}

impl MongoTaskRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    pub async fn create_indexes(&self) -> TaskResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "eventId": 1, "time": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_task_event_time".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }

    fn set_changes(changes: &TaskChanges, updated_at: DateTime<Utc>) -> Document {
        let mut set = Document::new();

        if let Some(name) = &changes.task_name {
            set.insert("task_name", name.as_str());
        }
        if let Some(detail) = &changes.detail {
            set.insert("detail", detail.as_str());
        }
        if let Some(time) = &changes.time {
            set.insert("time", time.as_str());
        }
        set.insert("updatedAt", to_bson_datetime(updated_at));

        doc! { "$set": set }
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    #[instrument(skip(self, task), fields(task_id = %task.id, event_id = %task.event_id))]
    async fn insert(&self, task: Task) -> TaskResult<Task> {
        self.collection.insert_one(TaskDocument::from(&task)).await?;
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> TaskResult<Option<Task>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await?
            .map(Task::from))
    }

    #[instrument(skip(self))]
    async fn list_by_event(&self, event_id: ObjectId) -> TaskResult<Vec<Task>> {
        let documents: Vec<TaskDocument> = self
            .collection
            .find(doc! { "eventId": event_id })
            .sort(doc! { "time": 1, "createdAt": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(Task::from).collect())
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: ObjectId,
        changes: TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> TaskResult<Option<Task>> {
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, Self::set_changes(&changes, updated_at))
            .return_document(ReturnDocument::After)
            .await?
            .map(Task::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> TaskResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
