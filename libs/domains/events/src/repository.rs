use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::EventResult;
use crate::models::{Event, EventFields, EventFilter};

/// Persistence for events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: Event) -> EventResult<Event>;

    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>>;

    /// Events matching `filter`, ascending by date and time
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    /// Atomically overwrite the editable fields; `None` when no event has `id`
    async fn replace_fields(
        &self,
        id: ObjectId,
        fields: EventFields,
        updated_at: DateTime<Utc>,
    ) -> EventResult<Option<Event>>;

    /// `true` when a document was removed
    async fn delete(&self, id: ObjectId) -> EventResult<bool>;
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<ObjectId, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: Event) -> EventResult<Event> {
        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let events = self.events.read().await;

        let mut result: Vec<Event> = events
            .values()
            .filter(|e| filter.id.is_none_or(|id| e.id == id))
            .filter(|e| filter.search.as_deref().is_none_or(|q| e.matches_search(q)))
            .cloned()
            .collect();

        result.sort_by_key(|e| e.starts_at());
        Ok(result)
    }

    async fn replace_fields(
        &self,
        id: ObjectId,
        fields: EventFields,
        updated_at: DateTime<Utc>,
    ) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.get_mut(&id).map(|event| {
            event.apply_fields(fields, updated_at);
            event.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> EventResult<bool> {
        let mut events = self.events.write().await;
        Ok(events.remove(&id).is_some())
    }
}
