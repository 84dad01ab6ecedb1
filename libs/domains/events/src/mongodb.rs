//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventFields, EventFilter};
use crate::repository::EventRepository;
use axum_helpers::validation::DATE_FORMAT;

pub const COLLECTION: &str = "events";

/// Stored shape of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    details: String,
    host: String,
    /// YYYY-MM-DD keeps lexical and chronological order aligned
    date: String,
    time: String,
    location: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            details: event.details.clone(),
            host: event.host.clone(),
            date: event.date.format(DATE_FORMAT).to_string(),
            time: event.time.clone(),
            location: event.location.clone(),
            created_at: to_bson_datetime(event.created_at),
            updated_at: to_bson_datetime(event.updated_at),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> EventResult<Self> {
        let date = NaiveDate::parse_from_str(&doc.date, DATE_FORMAT).map_err(|e| {
            EventError::Database(format!("event {} has malformed date '{}': {}", doc.id, doc.date, e))
        })?;

        Ok(Event {
            id: doc.id,
            name: doc.name,
            details: doc.details,
            host: doc.host,
            date,
            time: doc.time,
            location: doc.location,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        })
    }
}

/// MongoDB-backed event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Create the listing index. Safe to call on every startup.
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "date": 1, "time": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_event_date_time".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    fn build_filter(filter: &EventFilter) -> Document {
        let mut doc = Document::new();

        if let Some(id) = filter.id {
            doc.insert("_id", id);
        }

        if let Some(term) = filter.search.as_deref() {
            let pattern = regex::escape(term);
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": &pattern, "$options": "i" } },
                    doc! { "details": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }

        doc
    }

    fn set_fields(fields: &EventFields, updated_at: DateTime<Utc>) -> Document {
        doc! {
            "$set": {
                "name": fields.name.as_str(),
                "details": fields.details.as_str(),
                "host": fields.host.as_str(),
                "date": fields.date.format(DATE_FORMAT).to_string(),
                "time": fields.time.as_str(),
                "location": fields.location.as_str(),
                "updatedAt": to_bson_datetime(updated_at),
            }
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert(&self, event: Event) -> EventResult<Event> {
        self.collection.insert_one(EventDocument::from(&event)).await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let documents: Vec<EventDocument> = self
            .collection
            .find(Self::build_filter(&filter))
            .sort(doc! { "date": 1, "time": 1 })
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self, fields))]
    async fn replace_fields(
        &self,
        id: ObjectId,
        fields: EventFields,
        updated_at: DateTime<Utc>,
    ) -> EventResult<Option<Event>> {
        self.collection
            .find_one_and_update(doc! { "_id": id }, Self::set_fields(&fields, updated_at))
            .return_document(ReturnDocument::After)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> EventResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
