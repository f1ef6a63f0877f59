//! [Store] kept in process memory, mirroring the constraints the Postgres schema enforces.

use crate::models::{
    Account, AccountChanges, Credentials, Ledger, LedgerChanges, NewAccount, NewLedger, NewUser,
    Transaction, TransactionParams, User,
};
use crate::sql::MetadataFilter;
use crate::store::{Page, Store, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// `@>` semantics for jsonb.
pub fn json_contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::Object(h), Value::Object(n)) => n
            .iter()
            .all(|(k, v)| h.get(k).map(|hv| json_contains(hv, v)).unwrap_or(false)),
        (Value::Array(h), Value::Array(n)) => {
            n.iter().all(|nv| h.iter().any(|hv| json_contains(hv, nv)))
        }
        (h, n) => h == n,
    }
}

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct Data {
    users: Vec<StoredUser>,
    ledgers: Vec<(Ledger, Option<Uuid>)>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl Data {
    fn ledger_exists(&self, uuid: Uuid) -> bool {
        self.ledgers.iter().any(|(l, _)| l.uuid == uuid)
    }

    fn account_in_ledger(&self, account: Uuid, ledger: Uuid) -> bool {
        self.accounts
            .iter()
            .any(|a| a.uuid == account && a.ledger_uuid == ledger)
    }

    fn check_refs(&self, params: &TransactionParams) -> Result<(), StoreError> {
        if !self.ledger_exists(params.ledger_uuid) {
            return Err(StoreError::Rejected("ledger does not exist".into()));
        }
        for account in [params.credit_account_uuid, params.debit_account_uuid] {
            if !self.account_in_ledger(account, params.ledger_uuid) {
                return Err(StoreError::Rejected("account does not exist in ledger".into()));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
    /// When set, every call fails as if the database were down.
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Owner recorded for a ledger.
    pub fn ledger_owner(&self, ledger: Uuid) -> Option<Uuid> {
        let data = self.data.lock().unwrap();
        data.ledgers
            .iter()
            .find(|(l, _)| l.uuid == ledger)
            .and_then(|(_, owner)| *owner)
    }

    fn guard(&self) -> Result<MutexGuard<'_, Data>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(self.data.lock().unwrap())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.guard().map(|_| ())
    }

    async fn create_ledger(&self, new: &NewLedger) -> Result<Ledger, StoreError> {
        let mut data = self.guard()?;
        let owner = new.owner.filter(|o| data.users.iter().any(|u| u.user.uuid == *o));
        let now = Utc::now();
        let ledger = Ledger {
            uuid: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            metadata: new.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        data.ledgers.push((ledger.clone(), owner));
        Ok(ledger)
    }

    async fn get_ledger(&self, uuid: Uuid) -> Result<Option<Ledger>, StoreError> {
        let data = self.guard()?;
        Ok(data.ledgers.iter().find(|(l, _)| l.uuid == uuid).map(|(l, _)| l.clone()))
    }

    async fn list_ledgers(&self, filter: &MetadataFilter) -> Result<Vec<Ledger>, StoreError> {
        let data = self.guard()?;
        let needle = filter.to_value();
        Ok(data
            .ledgers
            .iter()
            .filter(|(l, _)| json_contains(&l.metadata, &needle))
            .map(|(l, _)| l.clone())
            .collect())
    }

    async fn update_ledger(
        &self,
        uuid: Uuid,
        changes: &LedgerChanges,
    ) -> Result<Option<Ledger>, StoreError> {
        let mut data = self.guard()?;
        let Some((ledger, _)) = data.ledgers.iter_mut().find(|(l, _)| l.uuid == uuid) else {
            return Ok(None);
        };
        ledger.name = changes.name.clone();
        ledger.description = changes.description.clone();
        ledger.metadata = changes.metadata.clone();
        ledger.updated_at = Utc::now();
        Ok(Some(ledger.clone()))
    }

    async fn create_account(&self, new: &NewAccount) -> Result<Account, StoreError> {
        let mut data = self.guard()?;
        if !data.ledger_exists(new.ledger_uuid) {
            return Err(StoreError::Rejected("null value in column \"ledger_id\"".into()));
        }
        let now = Utc::now();
        let account = Account {
            uuid: Uuid::new_v4(),
            name: new.name.clone(),
            kind: new.kind,
            metadata: new.metadata.clone(),
            ledger_uuid: new.ledger_uuid,
            created_at: now,
            updated_at: now,
        };
        data.accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account(&self, uuid: Uuid) -> Result<Option<Account>, StoreError> {
        let data = self.guard()?;
        Ok(data.accounts.iter().find(|a| a.uuid == uuid).cloned())
    }

    async fn list_accounts(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<Vec<Account>, StoreError> {
        let data = self.guard()?;
        let needle = filter.to_value();
        Ok(data
            .accounts
            .iter()
            .filter(|a| a.ledger_uuid == ledger_uuid && json_contains(&a.metadata, &needle))
            .cloned()
            .collect())
    }

    async fn update_account(
        &self,
        uuid: Uuid,
        changes: &AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let mut data = self.guard()?;
        let Some(account) = data.accounts.iter_mut().find(|a| a.uuid == uuid) else {
            return Ok(None);
        };
        account.name = changes.name.clone();
        account.kind = changes.kind;
        account.metadata = changes.metadata.clone();
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn create_transaction(
        &self,
        params: &TransactionParams,
    ) -> Result<Transaction, StoreError> {
        let mut data = self.guard()?;
        data.check_refs(params)?;
        let now = Utc::now();
        let transaction = Transaction {
            uuid: Uuid::new_v4(),
            amount: params.amount,
            date: params.date,
            description: params.description.clone(),
            metadata: params.metadata.clone(),
            ledger_uuid: params.ledger_uuid,
            credit_account_uuid: params.credit_account_uuid,
            debit_account_uuid: params.debit_account_uuid,
            created_at: now,
            updated_at: now,
        };
        data.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(&self, uuid: Uuid) -> Result<Option<Transaction>, StoreError> {
        let data = self.guard()?;
        Ok(data.transactions.iter().find(|t| t.uuid == uuid).cloned())
    }

    async fn list_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
        page: Page,
    ) -> Result<Vec<Transaction>, StoreError> {
        let data = self.guard()?;
        let needle = filter.to_value();
        // Insertion order stands in for the serial id.
        let mut rows: Vec<(usize, &Transaction)> = data
            .transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.ledger_uuid == ledger_uuid && json_contains(&t.metadata, &needle))
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn count_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<i64, StoreError> {
        let data = self.guard()?;
        let needle = filter.to_value();
        let total = data
            .transactions
            .iter()
            .filter(|t| t.ledger_uuid == ledger_uuid && json_contains(&t.metadata, &needle))
            .count();
        Ok(total as i64)
    }

    async fn update_transaction(
        &self,
        uuid: Uuid,
        params: &TransactionParams,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut data = self.guard()?;
        if !data.transactions.iter().any(|t| t.uuid == uuid) {
            return Ok(None);
        }
        data.check_refs(params)?;
        let Some(transaction) = data.transactions.iter_mut().find(|t| t.uuid == uuid) else {
            return Ok(None);
        };
        transaction.amount = params.amount;
        transaction.date = params.date;
        transaction.description = params.description.clone();
        transaction.metadata = params.metadata.clone();
        transaction.ledger_uuid = params.ledger_uuid;
        transaction.credit_account_uuid = params.credit_account_uuid;
        transaction.debit_account_uuid = params.debit_account_uuid;
        transaction.updated_at = Utc::now();
        Ok(Some(transaction.clone()))
    }

    async fn delete_transaction(&self, uuid: Uuid) -> Result<bool, StoreError> {
        let mut data = self.guard()?;
        let before = data.transactions.len();
        data.transactions.retain(|t| t.uuid != uuid);
        Ok(data.transactions.len() != before)
    }

    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError> {
        let mut data = self.guard()?;
        if data.users.iter().any(|u| u.user.email == new.email) {
            return Err(StoreError::Duplicate {
                constraint: "users_email_key".into(),
            });
        }
        let user = User {
            uuid: Uuid::new_v4(),
            email: new.email.clone(),
            created_at: Utc::now(),
        };
        data.users.push(StoredUser {
            user: user.clone(),
            password: new.password_hash.clone(),
        });
        Ok(user)
    }

    async fn get_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let data = self.guard()?;
        Ok(data
            .users
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| Credentials {
                uuid: u.user.uuid,
                password: u.password.clone(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn containment_matches_jsonb() {
        let doc = json!({"user_id": 24, "tags": ["a", "b"], "nested": {"x": 1, "y": 2}});
        assert!(json_contains(&doc, &json!({})));
        assert!(json_contains(&doc, &json!({"user_id": 24})));
        assert!(json_contains(&doc, &json!({"tags": ["b"], "nested": {"x": 1}})));
        assert!(!json_contains(&doc, &json!({"user_id": "24"})));
        assert!(!json_contains(&doc, &json!({"missing": 1})));
    }
}
