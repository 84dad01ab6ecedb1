//! Attendee Service - Business logic layer

use chrono::Utc;
use database::mongodb::{DEFAULT_STORE_TIMEOUT, ObjectId, bounded, parse_id, parse_ids};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{AttendeeError, AttendeeResult};
use crate::models::{
    Attendee, AttendeePatch, AttendeePutCommand, AttendeePutOutcome, AttendeePutRequest,
    BulkUpdateResult, CreateAttendee, FoodCostPolicy, FoodCostSummary,
};
use crate::repository::AttendeeRepository;

/// Attendee service providing business logic operations
pub struct AttendeeService<R: AttendeeRepository> {
    repository: Arc<R>,
    store_timeout: Duration,
    food_cost_policy: FoodCostPolicy,
}

/// Coerce the `eventId` every attendee operation is scoped by
fn parse_event_id(raw: Option<&str>) -> AttendeeResult<ObjectId> {
    match raw.map(str::trim) {
        None | Some("") => Err(AttendeeError::Validation("eventId is required".into())),
        Some(raw) => parse_id(raw).map_err(|_| AttendeeError::Validation("invalid eventId".into())),
    }
}

fn parse_attendee_id(raw: &str) -> AttendeeResult<ObjectId> {
    parse_id(raw).map_err(|_| AttendeeError::InvalidId)
}

impl<R: AttendeeRepository> AttendeeService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            food_cost_policy: FoodCostPolicy::default(),
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_food_cost_policy(mut self, policy: FoodCostPolicy) -> Self {
        self.food_cost_policy = policy;
        self
    }

    pub fn food_cost_policy(&self) -> FoodCostPolicy {
        self.food_cost_policy
    }

    /// Attendees of one event, oldest first
    #[instrument(skip(self))]
    pub async fn list_attendees(&self, event_id: Option<&str>) -> AttendeeResult<Vec<Attendee>> {
        let event_id = parse_event_id(event_id)?;
        bounded(self.store_timeout, self.repository.list_by_event(event_id)).await?
    }

    #[instrument(skip(self))]
    pub async fn get_attendee(&self, id: &str) -> AttendeeResult<Attendee> {
        let id = parse_attendee_id(id)?;
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await??
            .ok_or(AttendeeError::NotFound)
    }

    /// Register an attendee for an event
    ///
    /// The email is normalized before the uniqueness check; the unique index
    /// catches concurrent registrations that slip past it.
    #[instrument(skip(self, input), fields(event_id = %input.event_id))]
    pub async fn add_attendee(&self, input: CreateAttendee) -> AttendeeResult<Attendee> {
        input.validate()?;
        let event_id = parse_event_id(Some(&input.event_id))?;
        let new = input.into_new(event_id);

        if bounded(self.store_timeout, self.repository.email_taken(&new.email, None)).await?? {
            warn!(email = %new.email, "attendee email already registered");
            return Err(AttendeeError::DuplicateEmail);
        }

        let food_cost = match new.food_cost {
            Some(cost) => cost,
            None => self.initial_food_cost(event_id).await?,
        };

        let attendee = Attendee::new(new, food_cost, Utc::now());
        let attendee = bounded(self.store_timeout, self.repository.insert(attendee)).await??;

        info!(attendee_id = %attendee.id, event_id = %attendee.event_id, "attendee added");
        Ok(attendee)
    }

    async fn initial_food_cost(&self, event_id: ObjectId) -> AttendeeResult<f64> {
        let event_cost = match self.food_cost_policy {
            FoodCostPolicy::Zero => None,
            FoodCostPolicy::InheritEvent => {
                bounded(self.store_timeout, self.repository.current_food_cost(event_id)).await??
            }
        };
        Ok(self.food_cost_policy.initial_cost(event_cost))
    }

    /// Set only the supplied fields of one attendee
    #[instrument(skip(self, patch), fields(attendee_id = %patch.id))]
    pub async fn update_attendee(&self, patch: AttendeePatch) -> AttendeeResult<Attendee> {
        patch.validate()?;
        let id = parse_attendee_id(&patch.id)?;

        let changes = patch.changes();
        if changes.is_empty() {
            return Err(AttendeeError::Validation("no fields to update".into()));
        }

        if let Some(email) = changes.email.as_deref() {
            if bounded(self.store_timeout, self.repository.find_by_id(id))
                .await??
                .is_none()
            {
                return Err(AttendeeError::NotFound);
            }
            if bounded(self.store_timeout, self.repository.email_taken(email, Some(id))).await?? {
                warn!(email = %email, "attendee email already registered");
                return Err(AttendeeError::DuplicateEmail);
            }
        }

        let attendee = bounded(
            self.store_timeout,
            self.repository.update(id, changes, Utc::now()),
        )
        .await??
        .ok_or(AttendeeError::NotFound)?;

        info!(attendee_id = %attendee.id, "attendee updated");
        Ok(attendee)
    }

    /// Set one food cost on a batch of an event's attendees
    ///
    /// Ids outside the event or unknown ids are not counted; a malformed id
    /// rejects the whole batch before the store is touched.
    #[instrument(skip(self, attendee_ids), fields(requested = attendee_ids.len()))]
    pub async fn bulk_set_food_cost(
        &self,
        event_id: &str,
        food_cost: f64,
        attendee_ids: &[String],
    ) -> AttendeeResult<BulkUpdateResult> {
        let event_id = parse_event_id(Some(event_id))?;
        if !food_cost.is_finite() || food_cost < 0.0 {
            return Err(AttendeeError::Validation(
                "foodCost must be a finite number >= 0".into(),
            ));
        }
        let ids = parse_ids(attendee_ids)
            .map_err(|e| AttendeeError::Validation(format!("invalid attendee id '{}'", e.raw)))?;

        if ids.is_empty() {
            return Ok(BulkUpdateResult { updated_count: 0 });
        }

        let updated_count = bounded(
            self.store_timeout,
            self.repository
                .set_food_cost(event_id, ids, food_cost, Utc::now()),
        )
        .await??;

        info!(%event_id, food_cost, updated_count, "food cost set");
        Ok(BulkUpdateResult { updated_count })
    }

    /// Dispatch a `PUT /attendees` body to the matching operation
    pub async fn apply_put(&self, request: AttendeePutRequest) -> AttendeeResult<AttendeePutOutcome> {
        match request.into_command().map_err(AttendeeError::Validation)? {
            AttendeePutCommand::Update(patch) => self
                .update_attendee(patch)
                .await
                .map(AttendeePutOutcome::Updated),
            AttendeePutCommand::BulkFoodCost {
                event_id,
                food_cost,
                attendee_ids,
            } => self
                .bulk_set_food_cost(&event_id, food_cost, &attendee_ids)
                .await
                .map(AttendeePutOutcome::Bulk),
        }
    }

    /// Attendee count and total food cost of an event
    #[instrument(skip(self))]
    pub async fn food_cost_summary(&self, event_id: Option<&str>) -> AttendeeResult<FoodCostSummary> {
        let event_id = parse_event_id(event_id)?;
        let attendees =
            bounded(self.store_timeout, self.repository.list_by_event(event_id)).await??;
        Ok(FoodCostSummary::of(event_id, &attendees))
    }

    #[instrument(skip(self))]
    pub async fn delete_attendee(&self, id: &str) -> AttendeeResult<()> {
        let id = parse_attendee_id(id)?;
        if !bounded(self.store_timeout, self.repository.delete(id)).await?? {
            return Err(AttendeeError::NotFound);
        }

        info!(attendee_id = %id, "attendee deleted");
        Ok(())
    }
}

impl<R: AttendeeRepository> Clone for AttendeeService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            store_timeout: self.store_timeout,
            food_cost_policy: self.food_cost_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryAttendeeRepository, MockAttendeeRepository};

    fn input(event_id: ObjectId, email: &str) -> CreateAttendee {
        CreateAttendee {
            event_id: event_id.to_hex(),
            attendee_name: "Ann Lee".into(),
            email: email.into(),
            phone: "555-0100".into(),
            food_allergies: None,
            food_cost: None,
        }
    }

    fn service() -> AttendeeService<InMemoryAttendeeRepository> {
        AttendeeService::new(InMemoryAttendeeRepository::new())
    }

    #[tokio::test]
    async fn test_listing_never_returns_other_events_attendees() {
        let service = service();
        let e1 = ObjectId::new();
        let e2 = ObjectId::new();
        let a = service.add_attendee(input(e1, "a@x.io")).await.unwrap();
        service.add_attendee(input(e2, "b@x.io")).await.unwrap();

        let listed = service.list_attendees(Some(&e1.to_hex())).await.unwrap();
        assert_eq!(listed, vec![a]);
    }

    #[tokio::test]
    async fn test_event_id_is_required_and_must_be_valid() {
        let service = service();

        let missing = service.list_attendees(None).await.unwrap_err();
        assert_eq!(missing.to_string(), "eventId is required");

        let malformed = service.list_attendees(Some("abc")).await.unwrap_err();
        assert_eq!(malformed.to_string(), "invalid eventId");

        let mut bad = input(ObjectId::new(), "a@x.io");
        bad.event_id = "nope".into();
        let err = service.add_attendee(bad).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid eventId");
    }

    #[tokio::test]
    async fn test_duplicate_email_keeps_first_attendee() {
        let service = service();
        let event = ObjectId::new();
        let first = service
            .add_attendee(input(event, "ann@example.com"))
            .await
            .unwrap();

        let err = service
            .add_attendee(input(event, " ANN@example.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, AttendeeError::DuplicateEmail));

        let stored = service.get_attendee(&first.id.to_hex()).await.unwrap();
        assert_eq!(stored, first);
        assert_eq!(
            service.list_attendees(Some(&event.to_hex())).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_explicit_food_cost_wins_over_policy() {
        let service = service().with_food_cost_policy(FoodCostPolicy::InheritEvent);
        let mut request = input(ObjectId::new(), "a@x.io");
        request.food_cost = Some(3.25);

        let attendee = service.add_attendee(request).await.unwrap();
        assert_eq!(attendee.food_cost, 3.25);
    }

    #[tokio::test]
    async fn test_zero_policy_starts_at_zero() {
        let service = service();
        let event = ObjectId::new();
        let mut first = input(event, "a@x.io");
        first.food_cost = Some(9.0);
        service.add_attendee(first).await.unwrap();

        let second = service.add_attendee(input(event, "b@x.io")).await.unwrap();
        assert_eq!(second.food_cost, 0.0);
    }

    #[tokio::test]
    async fn test_inherit_policy_copies_event_cost() {
        let service = service().with_food_cost_policy(FoodCostPolicy::InheritEvent);
        let event = ObjectId::new();

        let first = service.add_attendee(input(event, "a@x.io")).await.unwrap();
        assert_eq!(first.food_cost, 0.0);

        service
            .bulk_set_food_cost(&event.to_hex(), 12.5, &[first.id.to_hex()])
            .await
            .unwrap();

        let second = service.add_attendee(input(event, "b@x.io")).await.unwrap();
        assert_eq!(second.food_cost, 12.5);

        let elsewhere = service
            .add_attendee(input(ObjectId::new(), "c@x.io"))
            .await
            .unwrap();
        assert_eq!(elsewhere.food_cost, 0.0);
    }

    #[tokio::test]
    async fn test_bulk_food_cost_updates_only_listed_attendees() {
        let service = service();
        let event = ObjectId::new();
        let a1 = service.add_attendee(input(event, "a1@x.io")).await.unwrap();
        let a2 = service.add_attendee(input(event, "a2@x.io")).await.unwrap();
        let a3 = service.add_attendee(input(event, "a3@x.io")).await.unwrap();

        let result = service
            .bulk_set_food_cost(
                &event.to_hex(),
                5.0,
                &[a1.id.to_hex(), a2.id.to_hex(), ObjectId::new().to_hex()],
            )
            .await
            .unwrap();
        assert_eq!(result.updated_count, 2);

        let listed = service.list_attendees(Some(&event.to_hex())).await.unwrap();
        let costs: Vec<(ObjectId, f64)> = listed.iter().map(|a| (a.id, a.food_cost)).collect();
        assert!(costs.contains(&(a1.id, 5.0)));
        assert!(costs.contains(&(a2.id, 5.0)));
        assert!(costs.contains(&(a3.id, 0.0)));
    }

    #[tokio::test]
    async fn test_bulk_rejects_malformed_id_before_store() {
        let mut mock = MockAttendeeRepository::new();
        mock.expect_set_food_cost().never();

        let service = AttendeeService::new(mock);
        let err = service
            .bulk_set_food_cost(
                &ObjectId::new().to_hex(),
                5.0,
                &[ObjectId::new().to_hex(), "bogus".into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AttendeeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_bulk_with_no_ids_updates_nothing() {
        let mut mock = MockAttendeeRepository::new();
        mock.expect_set_food_cost().never();

        let service = AttendeeService::new(mock);
        let result = service
            .bulk_set_food_cost(&ObjectId::new().to_hex(), 5.0, &[])
            .await
            .unwrap();
        assert_eq!(result.updated_count, 0);
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_supplied_fields() {
        let service = service();
        let created = service
            .add_attendee(input(ObjectId::new(), "a@x.io"))
            .await
            .unwrap();

        let updated = service
            .update_attendee(AttendeePatch {
                id: created.id.to_hex(),
                phone: Some("555-0199".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.phone, "555-0199");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.attendee_name, created.attendee_name);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_patch_and_taken_email() {
        let service = service();
        let event = ObjectId::new();
        let a = service.add_attendee(input(event, "a@x.io")).await.unwrap();
        service.add_attendee(input(event, "b@x.io")).await.unwrap();

        let empty = service
            .update_attendee(AttendeePatch {
                id: a.id.to_hex(),
                ..Default::default()
            })
            .await;
        assert!(matches!(empty, Err(AttendeeError::Validation(_))));

        let taken = service
            .update_attendee(AttendeePatch {
                id: a.id.to_hex(),
                email: Some("B@x.io".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(taken, Err(AttendeeError::DuplicateEmail)));

        let own = service
            .update_attendee(AttendeePatch {
                id: a.id.to_hex(),
                email: Some("A@X.io".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(own.email, "a@x.io");
    }

    #[tokio::test]
    async fn test_update_missing_attendee_with_taken_email_is_not_found() {
        let service = service();
        service
            .add_attendee(input(ObjectId::new(), "ann@x.io"))
            .await
            .unwrap();

        let result = service
            .update_attendee(AttendeePatch {
                id: ObjectId::new().to_hex(),
                email: Some("ann@x.io".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AttendeeError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_attendee_is_not_found() {
        let result = service()
            .update_attendee(AttendeePatch {
                id: ObjectId::new().to_hex(),
                phone: Some("1".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AttendeeError::NotFound)));
    }

    #[tokio::test]
    async fn test_apply_put_dispatches_by_shape() {
        let service = service();
        let event = ObjectId::new();
        let a = service.add_attendee(input(event, "a@x.io")).await.unwrap();

        let outcome = service
            .apply_put(AttendeePutRequest {
                event_id: Some(event.to_hex()),
                food_cost: Some(4.0),
                attendees: Some(vec![crate::models::AttendeeRef { id: a.id.to_hex() }]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AttendeePutOutcome::Bulk(BulkUpdateResult { updated_count: 1 })
        );

        let neither = service.apply_put(AttendeePutRequest::default()).await;
        assert!(matches!(neither, Err(AttendeeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_summary_totals_food_cost() {
        let service = service();
        let event = ObjectId::new();
        for (email, cost) in [("a@x.io", 5.0), ("b@x.io", 7.25)] {
            let mut request = input(event, email);
            request.food_cost = Some(cost);
            service.add_attendee(request).await.unwrap();
        }

        let summary = service.food_cost_summary(Some(&event.to_hex())).await.unwrap();
        assert_eq!(summary.event_id, event);
        assert_eq!(summary.attendee_count, 2);
        assert_eq!(summary.total_food_cost, 12.25);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        let a = service
            .add_attendee(input(ObjectId::new(), "a@x.io"))
            .await
            .unwrap();

        service.delete_attendee(&a.id.to_hex()).await.unwrap();
        assert!(matches!(
            service.delete_attendee(&a.id.to_hex()).await,
            Err(AttendeeError::NotFound)
        ));
        assert!(matches!(
            service.delete_attendee("").await,
            Err(AttendeeError::InvalidId)
        ));
    }

    #[tokio::test]
    async fn test_unique_index_race_surfaces_as_duplicate() {
        let mut mock = MockAttendeeRepository::new();
        mock.expect_email_taken().returning(|_, _| Ok(false));
        mock.expect_insert()
            .returning(|_| Err(AttendeeError::DuplicateEmail));

        let service = AttendeeService::new(mock);
        let result = service.add_attendee(input(ObjectId::new(), "a@x.io")).await;
        assert!(matches!(result, Err(AttendeeError::DuplicateEmail)));
    }
}
