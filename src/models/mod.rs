//! Domain records returned by the store, request bodies, and the typed parameters between them.
//!
//! Each request type validates itself into the parameters the store accepts. Update requests
//! merge field by field with the stored record: a supplied value wins, anything else is carried
//! forward.

mod account;
mod ledger;
mod transaction;
mod user;

pub use account::*;
pub use ledger::*;
pub use transaction::*;
pub use user::*;

use crate::error::AppError;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Maximum length of names and descriptions.
pub const MAX_TEXT_LEN: usize = 255;

/// Parse a uuid that already passed validation.
pub(crate) fn parse_validated_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::InvalidRequest)
}

/// Absent metadata is stored as an empty object.
pub(crate) fn metadata_or_empty(metadata: Option<Map<String, Value>>) -> Value {
    Value::Object(metadata.unwrap_or_default())
}

/// Pick the incoming string when it is non-empty.
pub(crate) fn merge_text(incoming: Option<String>, current: &str) -> String {
    incoming
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| current.to_string())
}
