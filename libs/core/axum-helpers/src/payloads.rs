//! Small success bodies shared by the resource routers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a newly created document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedId {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c0a2b3d4e5f601234567")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
