use super::{Page, Store, StoreError};
use crate::models::{
    Account, AccountChanges, Credentials, Ledger, LedgerChanges, NewAccount, NewLedger, NewUser,
    Transaction, TransactionParams, User,
};
use crate::sql::{statements, MetadataFilter};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query(statements::PING).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_ledger(&self, new: &NewLedger) -> Result<Ledger, StoreError> {
        tracing::debug!(name = %new.name, owner = ?new.owner, "insert ledger");
        let ledger = sqlx::query_as::<_, Ledger>(statements::INSERT_LEDGER)
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.metadata)
            .bind(new.owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(ledger)
    }

    async fn get_ledger(&self, uuid: Uuid) -> Result<Option<Ledger>, StoreError> {
        let ledger = sqlx::query_as::<_, Ledger>(&statements::select_ledger())
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ledger)
    }

    async fn list_ledgers(&self, filter: &MetadataFilter) -> Result<Vec<Ledger>, StoreError> {
        tracing::debug!(filter = %filter, "list ledgers");
        let rows = sqlx::query_as::<_, Ledger>(&statements::list_ledgers())
            .bind(filter.to_value())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_ledger(
        &self,
        uuid: Uuid,
        changes: &LedgerChanges,
    ) -> Result<Option<Ledger>, StoreError> {
        let ledger = sqlx::query_as::<_, Ledger>(statements::UPDATE_LEDGER)
            .bind(uuid)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.metadata)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ledger)
    }

    async fn create_account(&self, new: &NewAccount) -> Result<Account, StoreError> {
        tracing::debug!(name = %new.name, kind = %new.kind, ledger = %new.ledger_uuid, "insert account");
        let account = sqlx::query_as::<_, Account>(statements::INSERT_ACCOUNT)
            .bind(&new.name)
            .bind(new.kind)
            .bind(&new.metadata)
            .bind(new.ledger_uuid)
            .fetch_one(&self.pool)
            .await?;
        Ok(account)
    }

    async fn get_account(&self, uuid: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&statements::select_account())
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn list_accounts(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<Vec<Account>, StoreError> {
        tracing::debug!(ledger = %ledger_uuid, filter = %filter, "list accounts");
        let rows = sqlx::query_as::<_, Account>(&statements::list_accounts())
            .bind(ledger_uuid)
            .bind(filter.to_value())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_account(
        &self,
        uuid: Uuid,
        changes: &AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(statements::UPDATE_ACCOUNT)
            .bind(uuid)
            .bind(&changes.name)
            .bind(changes.kind)
            .bind(&changes.metadata)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn create_transaction(
        &self,
        params: &TransactionParams,
    ) -> Result<Transaction, StoreError> {
        tracing::debug!(
            amount = params.amount,
            credit = %params.credit_account_uuid,
            debit = %params.debit_account_uuid,
            "insert transaction"
        );
        let transaction = sqlx::query_as::<_, Transaction>(&statements::insert_transaction())
            .bind(params.amount)
            .bind(params.date)
            .bind(&params.description)
            .bind(&params.metadata)
            .bind(params.credit_account_uuid)
            .bind(params.debit_account_uuid)
            .bind(params.ledger_uuid)
            .fetch_one(&self.pool)
            .await?;
        Ok(transaction)
    }

    async fn get_transaction(&self, uuid: Uuid) -> Result<Option<Transaction>, StoreError> {
        let transaction = sqlx::query_as::<_, Transaction>(&statements::select_transaction())
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
        page: Page,
    ) -> Result<Vec<Transaction>, StoreError> {
        tracing::debug!(
            ledger = %ledger_uuid,
            filter = %filter,
            limit = page.limit,
            offset = page.offset,
            "list transactions"
        );
        let rows = sqlx::query_as::<_, Transaction>(&statements::list_transactions())
            .bind(ledger_uuid)
            .bind(filter.to_value())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_transactions(
        &self,
        ledger_uuid: Uuid,
        filter: &MetadataFilter,
    ) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar(statements::COUNT_TRANSACTIONS)
            .bind(ledger_uuid)
            .bind(filter.to_value())
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn update_transaction(
        &self,
        uuid: Uuid,
        params: &TransactionParams,
    ) -> Result<Option<Transaction>, StoreError> {
        let transaction = sqlx::query_as::<_, Transaction>(&statements::update_transaction())
            .bind(uuid)
            .bind(params.amount)
            .bind(params.date)
            .bind(&params.description)
            .bind(&params.metadata)
            .bind(params.credit_account_uuid)
            .bind(params.debit_account_uuid)
            .bind(params.ledger_uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    async fn delete_transaction(&self, uuid: Uuid) -> Result<bool, StoreError> {
        let deleted: Option<Uuid> = sqlx::query_scalar(statements::DELETE_TRANSACTION)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted.is_some())
    }

    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(statements::INSERT_USER)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let credentials = sqlx::query_as::<_, Credentials>(statements::SELECT_CREDENTIALS)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(credentials)
    }
}
