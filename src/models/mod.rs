//! Data models for the temple puja platform.
//!
//! These records mirror the backend JSON shapes. Absent fields fall back to
//! empty strings, zero, false, or empty lists.

mod auth;
mod blog;
mod booking;
mod category;
mod chadawa;
mod order;
mod plan;
mod product;
mod puja;
mod temple;
mod user;

pub use auth::*;
pub use blog::*;
pub use booking::*;
pub use category::*;
pub use chadawa::*;
pub use order::*;
pub use plan::*;
pub use product::*;
pub use puja::*;
pub use temple::*;
pub use user::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ClientError;

/// How a slice reconciles its cached list after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Re-run `fetch_all` with the last query
    Refetch,
    /// Splice the record returned by the API into the cached list
    Splice,
}

/// A REST collection managed by a store slice.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path relative to the API base URL.
    const PATH: &'static str;
    /// Singular name used in messages.
    const LABEL: &'static str;
    /// Form field carrying the file on multipart requests.
    const IMAGE_FIELD: &'static str = "image";
    const REFRESH: Refresh = Refresh::Refetch;

    fn id(&self) -> &str;

    /// Creation timestamp as sent by the API (RFC 3339), possibly empty.
    fn created_at(&self) -> &str;

    /// Client-side checks run before create and update.
    fn validate(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// A resource whose lifecycle status is changed through `PATCH {PATH}/{id}/status`.
pub trait StatusResource: Resource {
    type Status: Serialize + DeserializeOwned + Copy + Send + Sync + std::fmt::Debug;

    /// Parse a status as typed by an operator, rejecting values the API does not define.
    fn parse_status(raw: &str) -> Result<Self::Status, ClientError> {
        let raw = serde_json::Value::String(raw.trim().to_lowercase());
        let status: Self::Status = serde_json::from_value(raw.clone())?;
        if raw == "unknown" || serde_json::to_value(status)? != raw {
            return Err(ClientError::Validation(format!(
                "Unknown {} status {}",
                Self::LABEL,
                raw
            )));
        }
        Ok(status)
    }
}

/// Record ids arrive as `_id`, `id`, or both (documents serialized with virtuals).
/// `_id` wins when both are present; records are sent back with `_id` only.
pub(crate) mod record_id {
    use std::fmt;

    use serde::de::{IgnoredAny, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !id.is_empty() {
            map.serialize_entry("_id", id)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_map(RecordIdVisitor)
    }

    struct RecordIdVisitor;

    impl<'de> Visitor<'de> for RecordIdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a record keyed by `_id` or `id`")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
            let (mut primary, mut virtual_id) = (None, None);
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "_id" => primary = map.next_value::<Option<String>>()?,
                    "id" => virtual_id = map.next_value::<Option<String>>()?,
                    _ => {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
            }
            Ok(primary.or(virtual_id).unwrap_or_default())
        }
    }
}

pub(crate) fn require(value: &str, field: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn non_negative(value: f64, field: &str) -> Result<(), ClientError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientError::Validation(format!(
            "{} must be a non-negative amount",
            field
        )));
    }
    Ok(())
}

/// Price strings may be empty; if present they must parse as a non-negative amount.
pub(crate) fn optional_price(value: &str, field: &str) -> Result<(), ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match trimmed.parse::<f64>() {
        Ok(amount) => non_negative(amount, field),
        Err(_) => Err(ClientError::Validation(format!(
            "{} must be a number",
            field
        ))),
    }
}
