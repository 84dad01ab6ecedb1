use axum_helpers::validation::{clock_time, not_blank};
use chrono::{DateTime, Utc};
use database::mongodb::{ObjectId, object_id_as_hex};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Task entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id", with = "object_id_as_hex")]
    #[schema(value_type = String, example = "65f1c0a2b3d4e5f601234567")]
    pub id: ObjectId,
    #[serde(with = "object_id_as_hex")]
    #[schema(value_type = String)]
    pub event_id: ObjectId,
    #[serde(rename = "task_name")]
    pub task_name: String,
    pub detail: String,
    /// HH:MM, 24-hour clock
    #[schema(example = "14:30")]
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields of a new task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub event_id: ObjectId,
    pub task_name: String,
    pub detail: String,
    pub time: String,
}

/// `POST /tasks` body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[serde(rename = "eventId", default)]
    #[validate(custom(function = "not_blank"))]
    pub event_id: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub task_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub detail: String,
    #[serde(default)]
    #[validate(custom(function = "clock_time"))]
    #[schema(example = "14:30")]
    pub time: String,
}

/// `PUT /tasks` body: `_id` plus any subset of the editable fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[validate(custom(function = "not_blank"))]
    pub task_name: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub detail: Option<String>,
    #[validate(custom(function = "clock_time"))]
    pub time: Option<String>,
}

/// Normalized field changes for one task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub task_name: Option<String>,
    pub detail: Option<String>,
    pub time: Option<String>,
}

/// `?eventId=` query of `GET /tasks`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
}

/// `?id=` query of `DELETE /tasks`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskIdQuery {
    pub id: Option<String>,
}

impl CreateTask {
    pub fn into_new(self, event_id: ObjectId) -> NewTask {
        NewTask {
            event_id,
            task_name: self.task_name.trim().to_string(),
            detail: self.detail.trim().to_string(),
            time: self.time.trim().to_string(),
        }
    }
}

impl UpdateTask {
    pub fn changes(&self) -> TaskChanges {
        let trimmed = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        TaskChanges {
            task_name: trimmed(&self.task_name),
            detail: trimmed(&self.detail),
            time: trimmed(&self.time),
        }
    }
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none() && self.detail.is_none() && self.time.is_none()
    }
}

impl Task {
    pub fn new(new: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            event_id: new.event_id,
            task_name: new.task_name,
            detail: new.detail,
            time: new.time,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: &TaskChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.task_name {
            self.task_name = name.clone();
        }
        if let Some(detail) = &changes.detail {
            self.detail = detail.clone();
        }
        if let Some(time) = &changes.time {
            self.time = time.clone();
        }
        self.updated_at = now;
    }
}
