//! Event Service - Business logic layer

use chrono::{Local, Utc};
use database::mongodb::{DEFAULT_STORE_TIMEOUT, bounded, parse_id};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventFields, EventFilter, EventInput, EventQuery, EventSort, order_events};
use crate::repository::EventRepository;

/// Event service providing business logic operations
///
/// Identifiers arrive as strings and are coerced here; every repository
/// round-trip is bounded by `store_timeout`.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
    store_timeout: Duration,
}

impl<R: EventRepository> EventService<R> {
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

    /// List events, optionally narrowed to one id or a search term
    #[instrument(skip(self))]
    pub async fn list_events(&self, query: EventQuery) -> EventResult<Vec<Event>> {
        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") => EventSort::default(),
            Some(raw) => EventSort::from_str(raw)
                .map_err(|_| EventError::Validation(format!("unknown sort '{raw}'")))?,
        };

        let filter = match query.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => EventFilter {
                id: Some(parse_id(raw)?),
                search: None,
            },
            _ => match query.q.as_deref().map(str::trim) {
                Some(term) if !term.is_empty() => EventFilter::search(term),
                _ => EventFilter::default(),
            },
        };

        let events = bounded(self.store_timeout, self.repository.list(filter)).await??;
        Ok(order_events(events, sort, Local::now().naive_local()))
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str) -> EventResult<Event> {
        let id = parse_id(id)?;
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await??
            .ok_or(EventError::NotFound)
    }

    #[instrument(skip(self, input), fields(event_name = %input.name))]
    pub async fn create_event(&self, input: EventInput) -> EventResult<Event> {
        let fields = Self::validated(input)?;
        let event = Event::new(fields, Utc::now());

        let event = bounded(self.store_timeout, self.repository.insert(event)).await??;
        info!(event_id = %event.id, "event created");
        Ok(event)
    }

    /// Replace all six editable fields of an existing event
    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: &str, input: EventInput) -> EventResult<Event> {
        let id = parse_id(id)?;
        let fields = Self::validated(input)?;

        let event = bounded(
            self.store_timeout,
            self.repository.replace_fields(id, fields, Utc::now()),
        )
        .await??
        .ok_or(EventError::NotFound)?;

        info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: &str) -> EventResult<()> {
        let id = parse_id(id)?;
        if !bounded(self.store_timeout, self.repository.delete(id)).await?? {
            return Err(EventError::NotFound);
        }

        info!(event_id = %id, "event deleted");
        Ok(())
    }

    fn validated(input: EventInput) -> EventResult<EventFields> {
        input.validate()?;
        input
            .into_fields()
            .ok_or_else(|| EventError::Validation("date must be a valid YYYY-MM-DD date".into()))
    }
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            store_timeout: self.store_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryEventRepository, MockEventRepository};
    use database::mongodb::ObjectId;

    fn input(name: &str) -> EventInput {
        EventInput {
            name: name.to_string(),
            details: format!("{name} details"),
            host: "Ann".to_string(),
            date: "2030-06-01".to_string(),
            time: "09:30".to_string(),
            location: "Hall A".to_string(),
        }
    }

    fn service() -> EventService<InMemoryEventRepository> {
        EventService::new(InMemoryEventRepository::new())
    }

    #[tokio::test]
    async fn test_create_then_list_by_id_returns_stored_fields() {
        let service = service();
        let created = service.create_event(input("Tech Conf 2024")).await.unwrap();

        let listed = service
            .list_events(EventQuery {
                id: Some(created.id.to_hex()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
        assert_eq!(listed[0].name, "Tech Conf 2024");
        assert_eq!(listed[0].time, "09:30");
        assert_eq!(listed[0].created_at, listed[0].updated_at);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_name_and_details() {
        let service = service();
        service.create_event(input("Tech Conf 2024")).await.unwrap();
        service.create_event(input("Birthday Party")).await.unwrap();

        let found = service
            .list_events(EventQuery {
                q: Some("  conf ".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Tech Conf 2024");
    }

    #[tokio::test]
    async fn test_blank_search_lists_everything() {
        let service = service();
        service.create_event(input("a")).await.unwrap();
        service.create_event(input("b")).await.unwrap();

        let all = service
            .list_events(EventQuery {
                q: Some("   ".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_sort_is_rejected() {
        let result = service()
            .list_events(EventQuery {
                sort: Some("sideways".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_ids_are_invalid() {
        let service = service();
        assert!(matches!(
            service.get_event("not-an-id").await,
            Err(EventError::InvalidId)
        ));
        assert!(matches!(
            service.delete_event("123").await,
            Err(EventError::InvalidId)
        ));
        assert!(matches!(
            service
                .list_events(EventQuery {
                    id: Some("zz".into()),
                    ..Default::default()
                })
                .await,
            Err(EventError::InvalidId)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_malformed_fields() {
        let service = service();

        let mut blank = input("x");
        blank.host = "  ".into();
        assert!(matches!(
            service.create_event(blank).await,
            Err(EventError::Validation(_))
        ));

        let mut late = input("x");
        late.time = "24:00".into();
        assert!(matches!(
            service.create_event(late).await,
            Err(EventError::Validation(_))
        ));

        let mut bad_date = input("x");
        bad_date.date = "2024-02-30".into();
        assert!(matches!(
            service.create_event(bad_date).await,
            Err(EventError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_refreshes_updated_at() {
        let service = service();
        let created = service.create_event(input("Old")).await.unwrap();

        let updated = service
            .update_event(&created.id.to_hex(), input("New"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_event_leaves_store_unchanged() {
        let service = service();
        let existing = service.create_event(input("Keep")).await.unwrap();

        let result = service
            .update_event(&ObjectId::new().to_hex(), input("Ghost"))
            .await;
        assert!(matches!(result, Err(EventError::NotFound)));

        let all = service.list_events(EventQuery::default()).await.unwrap();
        assert_eq!(all, vec![existing]);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        let created = service.create_event(input("Once")).await.unwrap();
        let id = created.id.to_hex();

        service.delete_event(&id).await.unwrap();
        assert!(matches!(
            service.delete_event(&id).await,
            Err(EventError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_event_not_found() {
        let mut mock = MockEventRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let service = EventService::new(mock);
        let result = service.get_event(&ObjectId::new().to_hex()).await;
        assert!(matches!(result, Err(EventError::NotFound)));
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut mock = MockEventRepository::new();
        mock.expect_list()
            .returning(|_| Err(EventError::Database("connection reset".into())));

        let service = EventService::new(mock);
        let result = service.list_events(EventQuery::default()).await;
        assert!(matches!(result, Err(EventError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_repository() {
        let mut mock = MockEventRepository::new();
        mock.expect_insert().never();

        let service = EventService::new(mock);
        let result = service.create_event(EventInput::default()).await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    struct SlowRepository;

    #[async_trait::async_trait]
    impl EventRepository for SlowRepository {
        async fn insert(&self, event: Event) -> EventResult<Event> {
            Ok(event)
        }

        async fn find_by_id(&self, _id: ObjectId) -> EventResult<Option<Event>> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(None)
        }

        async fn list(&self, _filter: EventFilter) -> EventResult<Vec<Event>> {
            Ok(vec![])
        }

        async fn replace_fields(
            &self,
            _id: ObjectId,
            _fields: EventFields,
            _updated_at: chrono::DateTime<Utc>,
        ) -> EventResult<Option<Event>> {
            Ok(None)
        }

        async fn delete(&self, _id: ObjectId) -> EventResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let service =
            EventService::new(SlowRepository).with_store_timeout(Duration::from_millis(20));

        let result = service.get_event(&ObjectId::new().to_hex()).await;
        assert!(matches!(result, Err(EventError::Timeout(_))));
    }
}
