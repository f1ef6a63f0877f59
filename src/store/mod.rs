//! Persistence boundary. Handlers only see the [Store] trait; [PgStore] is the Postgres backend.

mod postgres;

pub use postgres::PgStore;

use crate::models::{
    Account, AccountChanges, Credentials, Ledger, LedgerChanges, NewAccount, NewLedger, NewUser,
    Transaction, TransactionParams, User,
};
use crate::sql::MetadataFilter;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    Duplicate { constraint: String },

    /// Any other error raised by the database: check, foreign key, not-null, trigger exceptions.
    #[error("rejected by database: {0}")]
    Rejected(String),

    #[error("database: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::Duplicate {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                };
            }
            return StoreError::Rejected(db.message().to_string());
        }
        StoreError::Sqlx(e)
    }
}

/// Window over a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Absent or non-positive limits fall back to the default; larger ones are capped.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(n) if n > 0 => n.min(Self::MAX_LIMIT),
            _ => Self::DEFAULT_LIMIT,
        };
        Page {
            limit,
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(None, None)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_ledger(&self, new: &NewLedger) -> Result<Ledger, StoreError>;
    async fn get_ledger(&self, uuid: Uuid) -> Result<Option<Ledger>, StoreError>;
    async fn list_ledgers(&self, filter: &MetadataFilter) -> Result<Vec<Ledger>, StoreError>;
    async fn update_ledger(
        &self,
        uuid: Uuid,
        changes: &LedgerChanges,
    ) -> Result<Option<Ledger>, StoreError>;

    async fn create_account(&self, new: &NewAccount) -> Result<Account, StoreError>;
    async fn get_account(&self, uuid: Uuid) -> Result<Option<Account>, StoreError>;
    async fn list_accounts(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<Vec<Account>, StoreError>;
    async fn update_account(
        &self,
        uuid: Uuid,
        changes: &AccountChanges,
    ) -> Result<Option<Account>, StoreError>;

    /// Writes the transaction and its two mirrored entries atomically.
    async fn create_transaction(&self, params: &TransactionParams)
        -> Result<Transaction, StoreError>;
    async fn get_transaction(&self, uuid: Uuid) -> Result<Option<Transaction>, StoreError>;
    async fn list_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
        page: Page,
    ) -> Result<Vec<Transaction>, StoreError>;
    /// Matches for the same ledger and filter, ignoring paging.
    async fn count_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<i64, StoreError>;
    /// Replaces every column and rewrites the entry pair.
    async fn update_transaction(
        &self,
        uuid: Uuid,
        params: &TransactionParams,
    ) -> Result<Option<Transaction>, StoreError>;
    /// `false` when no such transaction exists.
    async fn delete_transaction(&self, uuid: Uuid) -> Result<bool, StoreError>;

    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError>;
    async fn get_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError>;
}
