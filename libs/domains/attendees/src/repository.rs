use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AttendeeError, AttendeeResult};
use crate::models::{Attendee, AttendeeChanges};

/// Persistence for attendees
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Insert a new attendee. A taken email yields `DuplicateEmail`.
    async fn insert(&self, attendee: Attendee) -> AttendeeResult<Attendee>;

    async fn find_by_id(&self, id: ObjectId) -> AttendeeResult<Option<Attendee>>;

    /// Attendees of one event, oldest first
    async fn list_by_event(&self, event_id: ObjectId) -> AttendeeResult<Vec<Attendee>>;

    /// Whether another attendee (not `exclude`) already uses `email`
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AttendeeResult<bool>;

    /// Food cost of the event's most recently updated attendee
    async fn current_food_cost(&self, event_id: ObjectId) -> AttendeeResult<Option<f64>>;

    /// Set the supplied fields atomically; `None` when no attendee has `id`
    async fn update(
        &self,
        id: ObjectId,
        changes: AttendeeChanges,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<Option<Attendee>>;

    /// Set `foodCost` on the listed attendees of `event_id`; returns how many matched
    async fn set_food_cost(
        &self,
        event_id: ObjectId,
        ids: Vec<ObjectId>,
        food_cost: f64,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<u64>;

    async fn delete(&self, id: ObjectId) -> AttendeeResult<bool>;
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryAttendeeRepository {
    attendees: Arc<RwLock<HashMap<ObjectId, Attendee>>>,
}

impl InMemoryAttendeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_in_use(
    attendees: &HashMap<ObjectId, Attendee>,
    email: &str,
    exclude: Option<ObjectId>,
) -> bool {
    attendees
        .values()
        .any(|a| a.email == email && Some(a.id) != exclude)
}

#[async_trait]
impl AttendeeRepository for InMemoryAttendeeRepository {
    async fn insert(&self, attendee: Attendee) -> AttendeeResult<Attendee> {
        let mut attendees = self.attendees.write().await;
        if email_in_use(&attendees, &attendee.email, None) {
            return Err(AttendeeError::DuplicateEmail);
        }
        attendees.insert(attendee.id, attendee.clone());
        Ok(attendee)
    }

    async fn find_by_id(&self, id: ObjectId) -> AttendeeResult<Option<Attendee>> {
        let attendees = self.attendees.read().await;
        Ok(attendees.get(&id).cloned())
    }

    async fn list_by_event(&self, event_id: ObjectId) -> AttendeeResult<Vec<Attendee>> {
        let attendees = self.attendees.read().await;
        let mut result: Vec<Attendee> = attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| (a.created_at, a.id));
        Ok(result)
    }

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AttendeeResult<bool> {
        let attendees = self.attendees.read().await;
        Ok(email_in_use(&attendees, email, exclude))
    }

    async fn current_food_cost(&self, event_id: ObjectId) -> AttendeeResult<Option<f64>> {
        let attendees = self.attendees.read().await;
        Ok(attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .max_by_key(|a| a.updated_at)
            .map(|a| a.food_cost))
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: AttendeeChanges,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<Option<Attendee>> {
        let mut attendees = self.attendees.write().await;
        if !attendees.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = changes.email.as_deref() {
            if email_in_use(&attendees, email, Some(id)) {
                return Err(AttendeeError::DuplicateEmail);
            }
        }

        Ok(attendees.get_mut(&id).map(|attendee| {
            attendee.apply(&changes, updated_at);
            attendee.clone()
        }))
    }

    async fn set_food_cost(
        &self,
        event_id: ObjectId,
        ids: Vec<ObjectId>,
        food_cost: f64,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<u64> {
        let mut attendees = self.attendees.write().await;
        let mut matched = 0;
        for attendee in attendees.values_mut() {
            if attendee.event_id == event_id && ids.contains(&attendee.id) {
                attendee.food_cost = food_cost;
                attendee.updated_at = updated_at;
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn delete(&self, id: ObjectId) -> AttendeeResult<bool> {
        let mut attendees = self.attendees.write().await;
        Ok(attendees.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAttendee;

    fn attendee(event_id: ObjectId, email: &str) -> Attendee {
        Attendee::new(
            NewAttendee {
                event_id,
                attendee_name: "Ann".into(),
                email: email.into(),
                phone: "555".into(),
                food_allergies: "None".into(),
                food_cost: None,
            },
            0.0,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_email() {
        let repo = InMemoryAttendeeRepository::new();
        let event = ObjectId::new();
        let first = repo.insert(attendee(event, "ann@example.com")).await.unwrap();

        let result = repo.insert(attendee(event, "ann@example.com")).await;
        assert!(matches!(result, Err(AttendeeError::DuplicateEmail)));

        let stored = repo.find_by_id(first.id).await.unwrap();
        assert_eq!(stored, Some(first));
    }

    #[tokio::test]
    async fn test_set_food_cost_only_touches_listed_ids_of_event() {
        let repo = InMemoryAttendeeRepository::new();
        let event = ObjectId::new();
        let other_event = ObjectId::new();
        let a1 = repo.insert(attendee(event, "a1@x.io")).await.unwrap();
        let a2 = repo.insert(attendee(event, "a2@x.io")).await.unwrap();
        let a3 = repo.insert(attendee(event, "a3@x.io")).await.unwrap();
        let foreign = repo.insert(attendee(other_event, "f@x.io")).await.unwrap();

        let matched = repo
            .set_food_cost(event, vec![a1.id, a2.id, foreign.id], 5.0, Utc::now())
            .await
            .unwrap();
        assert_eq!(matched, 2);

        let cost = |id: ObjectId| {
            let repo = repo.clone();
            async move { repo.find_by_id(id).await.unwrap().unwrap().food_cost }
        };
        assert_eq!(cost(a1.id).await, 5.0);
        assert_eq!(cost(a2.id).await, 5.0);
        assert_eq!(cost(a3.id).await, 0.0);
        assert_eq!(cost(foreign.id).await, 0.0);
    }

    #[tokio::test]
    async fn test_email_taken_excludes_self() {
        let repo = InMemoryAttendeeRepository::new();
        let a = repo
            .insert(attendee(ObjectId::new(), "ann@example.com"))
            .await
            .unwrap();

        assert!(repo.email_taken("ann@example.com", None).await.unwrap());
        assert!(!repo.email_taken("ann@example.com", Some(a.id)).await.unwrap());
        assert!(!repo.email_taken("bob@example.com", None).await.unwrap());
    }
}
