use super::{merge_text, metadata_or_empty, MAX_TEXT_LEN};
use crate::error::AppError;
use crate::service::{provided, RequestValidator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Ledger {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLedgerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewLedger {
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
    /// User who created the ledger, when the request carried a session.
    pub owner: Option<Uuid>,
}

impl CreateLedgerRequest {
    pub fn validate(self, owner: Option<Uuid>) -> Result<NewLedger, AppError> {
        let mut v = RequestValidator::new();
        v.required("name", &self.name);
        v.max_len("name", self.name.as_deref(), MAX_TEXT_LEN);
        v.max_len("description", self.description.as_deref(), MAX_TEXT_LEN);
        v.finish()?;

        Ok(NewLedger {
            name: self.name.unwrap_or_default(),
            description: self.description.filter(|d| !d.is_empty()),
            metadata: metadata_or_empty(self.metadata),
            owner,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLedgerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Complete column values written by an update.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerChanges {
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
}

impl UpdateLedgerRequest {
    pub fn is_empty(&self) -> bool {
        !provided(&self.name) && !provided(&self.description) && self.metadata.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::InvalidRequest);
        }
        let mut v = RequestValidator::new();
        v.max_len("name", self.name.as_deref(), MAX_TEXT_LEN);
        v.max_len("description", self.description.as_deref(), MAX_TEXT_LEN);
        v.finish()
    }

    pub fn merge(self, current: &Ledger) -> LedgerChanges {
        let description = match self.description.filter(|d| !d.is_empty()) {
            Some(d) => Some(d),
            None => current.description.clone(),
        };
        LedgerChanges {
            name: merge_text(self.name, &current.name),
            description,
            metadata: self
                .metadata
                .map(Value::Object)
                .unwrap_or_else(|| current.metadata.clone()),
        }
    }
}
