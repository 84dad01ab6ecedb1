use axum_helpers::validation::{email_address, non_negative_amount, not_blank};
use chrono::{DateTime, Utc};
use database::mongodb::{ObjectId, object_id_as_hex};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Stored when no allergies are given
pub const NO_ALLERGIES: &str = "None";

/// Attendee entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(rename = "_id", alias = "id", with = "object_id_as_hex")]
    #[schema(value_type = String, example = "65f1c0a2b3d4e5f601234567")]
    pub id: ObjectId,
    #[serde(with = "object_id_as_hex")]
    #[schema(value_type = String, example = "65f1c0a2b3d4e5f601234500")]
    pub event_id: ObjectId,
    #[serde(rename = "attendee_name")]
    pub attendee_name: String,
    /// Trimmed and lowercased; unique across all attendees
    pub email: String,
    pub phone: String,
    pub food_allergies: String,
    pub food_cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized fields of a new attendee
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendee {
    pub event_id: ObjectId,
    pub attendee_name: String,
    pub email: String,
    pub phone: String,
    pub food_allergies: String,
    pub food_cost: Option<f64>,
}

/// `POST /attendees` body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAttendee {
    #[serde(rename = "eventId", default)]
    #[validate(custom(function = "not_blank"))]
    pub event_id: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub attendee_name: String,
    #[serde(default)]
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    /// Blank or absent stores "None"
    #[serde(rename = "foodAllergies", default)]
    pub food_allergies: Option<String>,
    /// Absent applies the configured food cost policy
    #[serde(rename = "foodCost", default)]
    #[validate(custom(function = "non_negative_amount"))]
    pub food_cost: Option<f64>,
}

/// Partial attendee update. Only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttendeePatch {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[validate(custom(function = "not_blank"))]
    pub attendee_name: Option<String>,
    #[validate(custom(function = "email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub phone: Option<String>,
    #[serde(rename = "foodAllergies")]
    pub food_allergies: Option<String>,
    #[serde(rename = "foodCost")]
    #[validate(custom(function = "non_negative_amount"))]
    pub food_cost: Option<f64>,
}

/// Normalized field changes for one attendee
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeeChanges {
    pub attendee_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub food_allergies: Option<String>,
    pub food_cost: Option<f64>,
}

/// Reference to an attendee inside a bulk request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendeeRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

/// `PUT /attendees` body.
///
/// Either `{"attendee": {...}}` for a single partial update, or
/// `{"eventId", "foodCost", "attendees": [{"_id"}]}` for a bulk food cost update.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AttendeePutRequest {
    #[validate(nested)]
    pub attendee: Option<AttendeePatch>,
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
    #[serde(rename = "foodCost")]
    #[validate(custom(function = "non_negative_amount"))]
    pub food_cost: Option<f64>,
    pub attendees: Option<Vec<AttendeeRef>>,
}

/// What a `PUT /attendees` body asks for
#[derive(Debug, Clone)]
pub enum AttendeePutCommand {
    Update(AttendeePatch),
    BulkFoodCost {
        event_id: String,
        food_cost: f64,
        attendee_ids: Vec<String>,
    },
}

/// Bulk update result; ids that matched nothing are simply not counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResult {
    pub updated_count: u64,
}

/// Response of `PUT /attendees`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AttendeePutOutcome {
    Updated(Attendee),
    Bulk(BulkUpdateResult),
}

/// Per-event food cost totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodCostSummary {
    #[serde(with = "object_id_as_hex")]
    #[schema(value_type = String)]
    pub event_id: ObjectId,
    pub attendee_count: u64,
    pub total_food_cost: f64,
}

/// `?eventId=` query of the listing and summary endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventIdQuery {
    /// Event whose attendees are requested
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
}

/// `?id=` query of `DELETE /attendees`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendeeIdQuery {
    pub id: Option<String>,
}

/// Initial `foodCost` of an attendee added without one
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FoodCostPolicy {
    /// Start at 0
    #[default]
    Zero,
    /// Copy the per-head cost already set on the event's other attendees
    InheritEvent,
}

impl FoodCostPolicy {
    /// Resolve the initial cost given the event's current per-head cost.
    pub fn initial_cost(self, event_cost: Option<f64>) -> f64 {
        match self {
            FoodCostPolicy::Zero => 0.0,
            FoodCostPolicy::InheritEvent => event_cost.unwrap_or(0.0),
        }
    }
}

/// Lowercased, trimmed email
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_allergies(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NO_ALLERGIES.to_string(),
    }
}

impl CreateAttendee {
    /// Normalize after `validate()`; the event id is coerced by the caller.
    pub fn into_new(self, event_id: ObjectId) -> NewAttendee {
        NewAttendee {
            event_id,
            attendee_name: self.attendee_name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            food_allergies: normalize_allergies(self.food_allergies.as_deref()),
            food_cost: self.food_cost,
        }
    }
}

impl AttendeePatch {
    pub fn changes(&self) -> AttendeeChanges {
        AttendeeChanges {
            attendee_name: self.attendee_name.as_deref().map(|v| v.trim().to_string()),
            email: self.email.as_deref().map(normalize_email),
            phone: self.phone.as_deref().map(|v| v.trim().to_string()),
            food_allergies: self
                .food_allergies
                .as_deref()
                .map(|v| normalize_allergies(Some(v))),
            food_cost: self.food_cost,
        }
    }
}

impl AttendeeChanges {
    pub fn is_empty(&self) -> bool {
        self.attendee_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.food_allergies.is_none()
            && self.food_cost.is_none()
    }
}

impl AttendeePutRequest {
    /// Decide which of the two accepted shapes this body has.
    pub fn into_command(self) -> Result<AttendeePutCommand, String> {
        match self {
            AttendeePutRequest {
                attendee: Some(patch),
                event_id: None,
                food_cost: None,
                attendees: None,
            } => Ok(AttendeePutCommand::Update(patch)),
            AttendeePutRequest {
                attendee: None,
                event_id: Some(event_id),
                food_cost: Some(food_cost),
                attendees: Some(attendees),
            } => Ok(AttendeePutCommand::BulkFoodCost {
                event_id,
                food_cost,
                attendee_ids: attendees.into_iter().map(|a| a.id).collect(),
            }),
            _ => Err(
                "body must contain either `attendee`, or `eventId`, `foodCost` and `attendees`"
                    .to_string(),
            ),
        }
    }
}

impl Attendee {
    pub fn new(new: NewAttendee, food_cost: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            event_id: new.event_id,
            attendee_name: new.attendee_name,
            email: new.email,
            phone: new.phone,
            food_allergies: new.food_allergies,
            food_cost,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields only.
    pub fn apply(&mut self, changes: &AttendeeChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.attendee_name {
            self.attendee_name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(phone) = &changes.phone {
            self.phone = phone.clone();
        }
        if let Some(allergies) = &changes.food_allergies {
            self.food_allergies = allergies.clone();
        }
        if let Some(cost) = changes.food_cost {
            self.food_cost = cost;
        }
        self.updated_at = now;
    }
}

impl FoodCostSummary {
    pub fn of(event_id: ObjectId, attendees: &[Attendee]) -> Self {
        Self {
            event_id,
            attendee_count: attendees.len() as u64,
            total_food_cost: attendees.iter().map(|a| a.food_cost).sum(),
        }
    }
}
