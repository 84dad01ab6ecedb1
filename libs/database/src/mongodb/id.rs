//! Conversion between external identifier strings and `ObjectId`s
//!
//! Every identifier arriving over HTTP goes through [`parse_id`]; every
//! identifier leaving the service is rendered by [`format_id`] (or the
//! [`object_id_as_hex`] serde helper), so the two directions stay symmetric.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Length of the hex rendering of an `ObjectId`
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// The input is not the hex rendering of an `ObjectId`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{raw}'")]
pub struct InvalidIdentifier {
    pub raw: String,
}

/// Parse a 24-character hex string (surrounding whitespace ignored).
pub fn parse_id(raw: &str) -> Result<ObjectId, InvalidIdentifier> {
    let trimmed = raw.trim();
    let invalid = || InvalidIdentifier {
        raw: raw.to_string(),
    };

    if trimmed.len() != OBJECT_ID_HEX_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    ObjectId::parse_str(trimmed).map_err(|_| invalid())
}

/// Lowercase hex rendering, the inverse of [`parse_id`].
pub fn format_id(id: &ObjectId) -> String {
    id.to_hex()
}

/// Parse every entry of `raw`, failing on the first malformed one.
pub fn parse_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ObjectId>, InvalidIdentifier> {
    raw.iter().map(|s| parse_id(s.as_ref())).collect()
}

/// Serialize an `ObjectId` as its hex string and read it back through [`parse_id`].
///
/// ```ignore
/// #[serde(rename = "_id", with = "database::mongodb::object_id_as_hex")]
/// pub id: ObjectId,
/// ```
pub mod object_id_as_hex {
    use super::{format_id, parse_id};
    use mongodb::bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_id(id))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_id(&raw).map_err(D::Error::custom)
    }
}
