use super::{merge_text, metadata_or_empty, parse_validated_uuid, MAX_TEXT_LEN};
use crate::error::AppError;
use crate::service::{provided, RequestValidator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Accounting category of an account. Stored as the `account_type` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "revenue" => Ok(AccountType::Revenue),
            "expense" => Ok(AccountType::Expense),
            other => Err(format!("unknown account type: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Account {
    pub uuid: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: AccountType,
    pub metadata: Value,
    pub ledger_uuid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub ledger_uuid: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountType,
    pub metadata: Value,
    pub ledger_uuid: Uuid,
}

fn check_format(v: &mut RequestValidator, name: Option<&str>, kind: Option<&str>) {
    v.max_len("name", name, MAX_TEXT_LEN);
    v.one_of::<AccountType>("type", kind);
}

impl CreateAccountRequest {
    pub fn validate(self) -> Result<NewAccount, AppError> {
        let mut v = RequestValidator::new();
        v.required("name", &self.name);
        v.required("type", &self.kind);
        v.required("ledger_uuid", &self.ledger_uuid);
        check_format(&mut v, self.name.as_deref(), self.kind.as_deref());
        v.uuid("ledger_uuid", self.ledger_uuid.as_deref());
        v.finish()?;

        let kind = self
            .kind
            .as_deref()
            .unwrap_or_default()
            .parse::<AccountType>()
            .map_err(|_| AppError::InvalidRequest)?;
        Ok(NewAccount {
            name: self.name.unwrap_or_default(),
            kind,
            metadata: metadata_or_empty(self.metadata),
            ledger_uuid: parse_validated_uuid(self.ledger_uuid.as_deref().unwrap_or_default())?,
        })
    }
}

/// An account stays in the ledger it was created in; `ledger_uuid` in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccountChanges {
    pub name: String,
    pub kind: AccountType,
    pub metadata: Value,
}

impl UpdateAccountRequest {
    pub fn is_empty(&self) -> bool {
        !provided(&self.name) && !provided(&self.kind) && self.metadata.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::InvalidRequest);
        }
        let mut v = RequestValidator::new();
        check_format(&mut v, self.name.as_deref(), self.kind.as_deref());
        v.finish()
    }

    /// Call after [UpdateAccountRequest::validate].
    pub fn merge(self, current: &Account) -> Result<AccountChanges, AppError> {
        let kind = match self.kind.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s.parse().map_err(|_| AppError::InvalidRequest)?,
            None => current.kind,
        };
        Ok(AccountChanges {
            name: merge_text(self.name, &current.name),
            kind,
            metadata: self
                .metadata
                .map(Value::Object)
                .unwrap_or_else(|| current.metadata.clone()),
        })
    }
}
