use super::{metadata_or_empty, parse_validated_uuid, MAX_TEXT_LEN};
use crate::error::AppError;
use crate::service::{provided, RequestValidator};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A transfer of `amount` from the credit account to the debit account.
/// Read from the `transaction_details` view, which flattens the two mirrored entries.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub uuid: Uuid,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub metadata: Value,
    pub ledger_uuid: Uuid,
    pub credit_account_uuid: Uuid,
    pub debit_account_uuid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub credit_account_uuid: Option<String>,
    pub debit_account_uuid: Option<String>,
    pub ledger_uuid: Option<String>,
}

/// Every column of a transaction and its entry pair. Used for both create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionParams {
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub metadata: Value,
    pub credit_account_uuid: Uuid,
    pub debit_account_uuid: Uuid,
    pub ledger_uuid: Uuid,
}

impl CreateTransactionRequest {
    pub fn validate(self) -> Result<TransactionParams, AppError> {
        let mut v = RequestValidator::new();
        if v.required("amount", &self.amount) {
            v.check("amount", self.amount.unwrap_or_default() > 0);
        }
        v.required("date", &self.date);
        v.max_len("description", self.description.as_deref(), MAX_TEXT_LEN);
        v.required("credit_account_uuid", &self.credit_account_uuid);
        v.required("debit_account_uuid", &self.debit_account_uuid);
        v.required("ledger_uuid", &self.ledger_uuid);
        v.uuid("credit_account_uuid", self.credit_account_uuid.as_deref());
        v.uuid("debit_account_uuid", self.debit_account_uuid.as_deref());
        v.uuid("ledger_uuid", self.ledger_uuid.as_deref());
        if provided(&self.credit_account_uuid) {
            v.check(
                "debit_account_uuid",
                self.credit_account_uuid != self.debit_account_uuid,
            );
        }
        v.finish()?;

        Ok(TransactionParams {
            amount: self.amount.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            description: self.description.filter(|d| !d.is_empty()),
            metadata: metadata_or_empty(self.metadata),
            credit_account_uuid: parse_validated_uuid(
                self.credit_account_uuid.as_deref().unwrap_or_default(),
            )?,
            debit_account_uuid: parse_validated_uuid(
                self.debit_account_uuid.as_deref().unwrap_or_default(),
            )?,
            ledger_uuid: parse_validated_uuid(self.ledger_uuid.as_deref().unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub credit_account_uuid: Option<String>,
    pub debit_account_uuid: Option<String>,
    pub ledger_uuid: Option<String>,
}

impl UpdateTransactionRequest {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && !provided(&self.description)
            && self.metadata.is_none()
            && !provided(&self.credit_account_uuid)
            && !provided(&self.debit_account_uuid)
            && !provided(&self.ledger_uuid)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::InvalidRequest);
        }
        let mut v = RequestValidator::new();
        if let Some(amount) = self.amount {
            v.check("amount", amount > 0);
        }
        v.max_len("description", self.description.as_deref(), MAX_TEXT_LEN);
        v.uuid("credit_account_uuid", self.credit_account_uuid.as_deref());
        v.uuid("debit_account_uuid", self.debit_account_uuid.as_deref());
        v.uuid("ledger_uuid", self.ledger_uuid.as_deref());
        v.finish()
    }

    /// Overlay the supplied fields on `current`. The merged pair must still name two
    /// different accounts. Call after [UpdateTransactionRequest::validate].
    pub fn merge(self, current: &Transaction) -> Result<TransactionParams, AppError> {
        let pick = |incoming: Option<String>, fallback: Uuid| -> Result<Uuid, AppError> {
            match incoming.filter(|s| !s.is_empty()) {
                Some(s) => parse_validated_uuid(&s),
                None => Ok(fallback),
            }
        };
        let merged = TransactionParams {
            amount: self.amount.unwrap_or(current.amount),
            date: self.date.unwrap_or(current.date),
            description: match self.description.filter(|d| !d.is_empty()) {
                Some(d) => Some(d),
                None => current.description.clone(),
            },
            metadata: self
                .metadata
                .map(Value::Object)
                .unwrap_or_else(|| current.metadata.clone()),
            credit_account_uuid: pick(self.credit_account_uuid, current.credit_account_uuid)?,
            debit_account_uuid: pick(self.debit_account_uuid, current.debit_account_uuid)?,
            ledger_uuid: pick(self.ledger_uuid, current.ledger_uuid)?,
        };

        let mut v = RequestValidator::new();
        v.check(
            "debit_account_uuid",
            merged.credit_account_uuid != merged.debit_account_uuid,
        );
        v.finish()?;
        Ok(merged)
    }
}
