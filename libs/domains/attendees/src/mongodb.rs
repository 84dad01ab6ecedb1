//! MongoDB implementation of AttendeeRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{AttendeeError, AttendeeResult};
use crate::models::{Attendee, AttendeeChanges};
use crate::repository::AttendeeRepository;

pub const COLLECTION: &str = "attendees";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttendeeDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    event_id: ObjectId,
    #[serde(rename = "attendee_name")]
    attendee_name: String,
    email: String,
    phone: String,
    food_allergies: String,
    food_cost: f64,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl From<&Attendee> for AttendeeDocument {
    fn from(a: &Attendee) -> Self {
        Self {
            id: a.id,
            event_id: a.event_id,
            attendee_name: a.attendee_name.clone(),
            email: a.email.clone(),
            phone: a.phone.clone(),
            food_allergies: a.food_allergies.clone(),
            food_cost: a.food_cost,
            created_at: to_bson_datetime(a.created_at),
            updated_at: to_bson_datetime(a.updated_at),
        }
    }
}

impl From<AttendeeDocument> for Attendee {
    fn from(doc: AttendeeDocument) -> Self {
        Self {
            id: doc.id,
            event_id: doc.event_id,
            attendee_name: doc.attendee_name,
            email: doc.email,
            phone: doc.phone,
            food_allergies: doc.food_allergies,
            food_cost: doc.food_cost,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// MongoDB-backed attendee repository
#[derive(Clone)]
pub struct MongoAttendeeRepository {
    collection: Collection<AttendeeDocument>,
}

impl MongoAttendeeRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Create the unique email index and the per-event listing index
    pub async fn create_indexes(&self) -> AttendeeResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_attendee_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "eventId": 1, "createdAt": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_attendee_event_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    fn email_filter(email: &str, exclude: Option<ObjectId>) -> Document {
        let mut filter = doc! { "email": email };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        filter
    }

    fn set_changes(changes: &AttendeeChanges, updated_at: DateTime<Utc>) -> Document {
        let mut set = Document::new();

        if let Some(name) = &changes.attendee_name {
            set.insert("attendee_name", name.as_str());
        }
        if let Some(email) = &changes.email {
            set.insert("email", email.as_str());
        }
        if let Some(phone) = &changes.phone {
            set.insert("phone", phone.as_str());
        }
        if let Some(allergies) = &changes.food_allergies {
            set.insert("foodAllergies", allergies.as_str());
        }
        if let Some(cost) = changes.food_cost {
            set.insert("foodCost", cost);
        }
        set.insert("updatedAt", to_bson_datetime(updated_at));

        doc! { "$set": set }
    }

    fn bulk_filter(event_id: ObjectId, ids: &[ObjectId]) -> Document {
        doc! {
            "_id": { "$in": ids.to_vec() },
            "eventId": event_id,
        }
    }
}

#[async_trait]
impl AttendeeRepository for MongoAttendeeRepository {
    #[instrument(skip(self, attendee), fields(attendee_id = %attendee.id, event_id = %attendee.event_id))]
    async fn insert(&self, attendee: Attendee) -> AttendeeResult<Attendee> {
        self.collection
            .insert_one(AttendeeDocument::from(&attendee))
            .await
            .map_err(|e| {
                let err = AttendeeError::from(e);
                if matches!(err, AttendeeError::DuplicateEmail) {
                    warn!("unique email index rejected insert");
                }
                err
            })?;
        Ok(attendee)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> AttendeeResult<Option<Attendee>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await?
            .map(Attendee::from))
    }

    #[instrument(skip(self))]
    async fn list_by_event(&self, event_id: ObjectId) -> AttendeeResult<Vec<Attendee>> {
        let documents: Vec<AttendeeDocument> = self
            .collection
            .find(doc! { "eventId": event_id })
            .sort(doc! { "createdAt": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(Attendee::from).collect())
    }

    #[instrument(skip(self))]
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AttendeeResult<bool> {
        let count = self
            .collection
            .count_documents(Self::email_filter(email, exclude))
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn current_food_cost(&self, event_id: ObjectId) -> AttendeeResult<Option<f64>> {
        Ok(self
            .collection
            .find_one(doc! { "eventId": event_id })
            .sort(doc! { "updatedAt": -1 })
            .await?
            .map(|doc| doc.food_cost))
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: ObjectId,
        changes: AttendeeChanges,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<Option<Attendee>> {
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, Self::set_changes(&changes, updated_at))
            .return_document(ReturnDocument::After)
            .await?
            .map(Attendee::from))
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn set_food_cost(
        &self,
        event_id: ObjectId,
        ids: Vec<ObjectId>,
        food_cost: f64,
        updated_at: DateTime<Utc>,
    ) -> AttendeeResult<u64> {
        let result = self
            .collection
            .update_many(
                Self::bulk_filter(event_id, &ids),
                doc! {
                    "$set": {
                        "foodCost": food_cost,
                        "updatedAt": to_bson_datetime(updated_at),
                    }
                },
            )
            .await?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> AttendeeResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
