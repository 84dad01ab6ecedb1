use axum_helpers::validation::{DATE_FORMAT, calendar_date, clock_time, not_blank};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use database::mongodb::{ObjectId, object_id_as_hex};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Event entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id", with = "object_id_as_hex")]
    #[schema(value_type = String, example = "65f1c0a2b3d4e5f601234567")]
    pub id: ObjectId,
    pub name: String,
    pub details: String,
    pub host: String,
    #[schema(value_type = String, format = Date, example = "2024-06-01")]
    pub date: NaiveDate,
    /// HH:MM, 24-hour clock
    #[schema(example = "18:30")]
    pub time: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The six user-editable fields, already validated and normalized
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub details: String,
    pub host: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
}

/// Request body for creating an event, and for the full replace done by update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct EventInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub details: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub host: String,
    /// YYYY-MM-DD
    #[serde(default)]
    #[validate(custom(function = "calendar_date"))]
    #[schema(example = "2024-06-01")]
    pub date: String,
    /// HH:MM, 24-hour clock
    #[serde(default)]
    #[validate(custom(function = "clock_time"))]
    #[schema(example = "18:30")]
    pub time: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub location: String,
}

/// `PUT /events` body: identifier travels next to the fields
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: EventInput,
}

/// `DELETE /events` body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteEventRequest {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
}

/// Listing order for events
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventSort {
    /// Future events soonest first, then past events oldest first
    #[default]
    Upcoming,
    /// Latest date and time first
    DateDesc,
}

/// Query parameters of `GET /events`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    /// Return at most the event with this identifier
    pub id: Option<String>,
    /// Case-insensitive substring matched against name and details
    pub q: Option<String>,
    /// `upcoming` (default) or `date_desc`
    pub sort: Option<String>,
}

/// Store-level listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub id: Option<ObjectId>,
    pub search: Option<String>,
}

impl EventInput {
    /// Trim text fields and parse the date. Call after `validate()`.
    pub fn into_fields(self) -> Option<EventFields> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()?;
        Some(EventFields {
            name: self.name.trim().to_string(),
            details: self.details.trim().to_string(),
            host: self.host.trim().to_string(),
            date,
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
        })
    }
}

impl EventFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            id: None,
            search: Some(term.into()),
        }
    }
}

impl Event {
    pub fn new(fields: EventFields, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: fields.name,
            details: fields.details,
            host: fields.host,
            date: fields.date,
            time: fields.time,
            location: fields.location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace all user-editable fields.
    pub fn apply_fields(&mut self, fields: EventFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.details = fields.details;
        self.host = fields.host;
        self.date = fields.date;
        self.time = fields.time;
        self.location = fields.location;
        self.updated_at = now;
    }

    /// Wall-clock start. An unparsable time counts as midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M").unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }

    /// Case-insensitive substring match on name or details.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.details.to_lowercase().contains(&term)
    }
}

/// Order events for listing relative to `now`.
pub fn order_events(mut events: Vec<Event>, sort: EventSort, now: NaiveDateTime) -> Vec<Event> {
    match sort {
        EventSort::Upcoming => {
            events.sort_by_key(|e| (e.starts_at() < now, e.starts_at()));
        }
        EventSort::DateDesc => {
            events.sort_by_key(|e| std::cmp::Reverse(e.starts_at()));
        }
    }
    events
}
