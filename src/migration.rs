//! Schema the API calls into: tables, the `account_type` enum, the balance trigger and the
//! stored functions that write a transaction together with its entries.
//!
//! Statements run one at a time, in dependency order, and are safe to re-run.

use crate::store::StoreError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Tables truncated by [reset_data], children first.
pub const DATA_TABLES: &[&str] = &["entries", "transactions", "accounts", "ledgers", "users"];

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        uuid UUID NOT NULL DEFAULT gen_random_uuid() UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        email TEXT NOT NULL,
        password TEXT NOT NULL,
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'revenue', 'expense');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ledgers (
        id BIGSERIAL PRIMARY KEY,
        uuid UUID NOT NULL DEFAULT gen_random_uuid() UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        name TEXT NOT NULL CHECK (char_length(name) <= 255),
        description TEXT CHECK (char_length(description) <= 255),
        metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
        user_id BIGINT REFERENCES users (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ledgers_metadata_idx ON ledgers USING gin (metadata)",
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        uuid UUID NOT NULL DEFAULT gen_random_uuid() UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        name TEXT NOT NULL CHECK (char_length(name) <= 255),
        type account_type NOT NULL,
        metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
        ledger_id BIGINT NOT NULL REFERENCES ledgers (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS accounts_ledger_id_idx ON accounts (ledger_id)",
    "CREATE INDEX IF NOT EXISTS accounts_metadata_idx ON accounts USING gin (metadata)",
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id BIGSERIAL PRIMARY KEY,
        uuid UUID NOT NULL DEFAULT gen_random_uuid() UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        amount BIGINT NOT NULL CHECK (amount > 0),
        date DATE NOT NULL,
        description TEXT CHECK (char_length(description) <= 255),
        metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
        ledger_id BIGINT NOT NULL REFERENCES ledgers (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS transactions_ledger_id_idx ON transactions (ledger_id)",
    "CREATE INDEX IF NOT EXISTS transactions_metadata_idx ON transactions USING gin (metadata)",
    r#"
    CREATE TABLE IF NOT EXISTS entries (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        amount BIGINT NOT NULL CHECK (amount <> 0),
        transaction_id BIGINT NOT NULL REFERENCES transactions (id) ON DELETE CASCADE,
        account_id BIGINT NOT NULL REFERENCES accounts (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS entries_transaction_id_idx ON entries (transaction_id)",
    r#"
    CREATE OR REPLACE FUNCTION check_transaction_balance() RETURNS trigger
    LANGUAGE plpgsql AS $$
    DECLARE
        v_transaction_id BIGINT;
        v_total BIGINT;
    BEGIN
        IF TG_OP = 'DELETE' THEN
            v_transaction_id := OLD.transaction_id;
        ELSE
            v_transaction_id := NEW.transaction_id;
        END IF;
        SELECT COALESCE(SUM(amount), 0) INTO v_total FROM entries WHERE transaction_id = v_transaction_id;
        IF v_total <> 0 THEN
            RAISE EXCEPTION 'Total balance of entries must be 0';
        END IF;
        RETURN NULL;
    END $$
    "#,
    "DROP TRIGGER IF EXISTS entries_balance ON entries",
    r#"
    CREATE CONSTRAINT TRIGGER entries_balance
        AFTER INSERT OR UPDATE OR DELETE ON entries
        DEFERRABLE INITIALLY DEFERRED
        FOR EACH ROW EXECUTE FUNCTION check_transaction_balance()
    "#,
    r#"
    CREATE OR REPLACE VIEW transaction_details AS
    SELECT t.id,
           t.uuid,
           t.amount,
           t.date,
           t.description,
           t.metadata,
           l.uuid AS ledger_uuid,
           ca.uuid AS credit_account_uuid,
           da.uuid AS debit_account_uuid,
           t.created_at,
           t.updated_at
      FROM transactions t
      JOIN ledgers l ON l.id = t.ledger_id
      JOIN entries ce ON ce.transaction_id = t.id AND ce.amount < 0
      JOIN accounts ca ON ca.id = ce.account_id
      JOIN entries de ON de.transaction_id = t.id AND de.amount > 0
      JOIN accounts da ON da.id = de.account_id
    "#,
    r#"
    CREATE OR REPLACE FUNCTION resolve_transaction_refs(
        p_ledger_uuid UUID,
        p_credit_account_uuid UUID,
        p_debit_account_uuid UUID,
        OUT out_ledger_id BIGINT,
        OUT out_credit_account_id BIGINT,
        OUT out_debit_account_id BIGINT
    ) LANGUAGE plpgsql AS $$
    BEGIN
        SELECT l.id INTO out_ledger_id FROM ledgers l WHERE l.uuid = p_ledger_uuid;
        IF out_ledger_id IS NULL THEN
            RAISE EXCEPTION 'ledger % does not exist', p_ledger_uuid USING ERRCODE = 'foreign_key_violation';
        END IF;
        SELECT a.id INTO out_credit_account_id FROM accounts a
         WHERE a.uuid = p_credit_account_uuid AND a.ledger_id = out_ledger_id;
        IF out_credit_account_id IS NULL THEN
            RAISE EXCEPTION 'credit account % does not exist in ledger', p_credit_account_uuid USING ERRCODE = 'foreign_key_violation';
        END IF;
        SELECT a.id INTO out_debit_account_id FROM accounts a
         WHERE a.uuid = p_debit_account_uuid AND a.ledger_id = out_ledger_id;
        IF out_debit_account_id IS NULL THEN
            RAISE EXCEPTION 'debit account % does not exist in ledger', p_debit_account_uuid USING ERRCODE = 'foreign_key_violation';
        END IF;
    END $$
    "#,
    r#"
    CREATE OR REPLACE FUNCTION create_transaction(
        p_amount BIGINT,
        p_date DATE,
        p_description TEXT,
        p_metadata JSONB,
        p_credit_account_uuid UUID,
        p_debit_account_uuid UUID,
        p_ledger_uuid UUID
    ) RETURNS SETOF transaction_details
    LANGUAGE plpgsql AS $$
    DECLARE
        v_refs RECORD;
        v_id BIGINT;
    BEGIN
        SELECT * INTO v_refs FROM resolve_transaction_refs(p_ledger_uuid, p_credit_account_uuid, p_debit_account_uuid);
        INSERT INTO transactions (amount, date, description, metadata, ledger_id)
        VALUES (p_amount, p_date, p_description, p_metadata, v_refs.out_ledger_id)
        RETURNING id INTO v_id;
        INSERT INTO entries (amount, transaction_id, account_id)
        VALUES (-p_amount, v_id, v_refs.out_credit_account_id),
               (p_amount, v_id, v_refs.out_debit_account_id);
        RETURN QUERY SELECT * FROM transaction_details WHERE id = v_id;
    END $$
    "#,
    r#"
    CREATE OR REPLACE FUNCTION update_transaction(
        p_uuid UUID,
        p_amount BIGINT,
        p_date DATE,
        p_description TEXT,
        p_metadata JSONB,
        p_credit_account_uuid UUID,
        p_debit_account_uuid UUID,
        p_ledger_uuid UUID
    ) RETURNS SETOF transaction_details
    LANGUAGE plpgsql AS $$
    DECLARE
        v_refs RECORD;
        v_id BIGINT;
    BEGIN
        SELECT id INTO v_id FROM transactions WHERE uuid = p_uuid FOR UPDATE;
        IF v_id IS NULL THEN
            RETURN;
        END IF;
        SELECT * INTO v_refs FROM resolve_transaction_refs(p_ledger_uuid, p_credit_account_uuid, p_debit_account_uuid);
        UPDATE transactions
           SET amount = p_amount,
               date = p_date,
               description = p_description,
               metadata = p_metadata,
               ledger_id = v_refs.out_ledger_id,
               updated_at = NOW()
         WHERE id = v_id;
        DELETE FROM entries WHERE transaction_id = v_id;
        INSERT INTO entries (amount, transaction_id, account_id)
        VALUES (-p_amount, v_id, v_refs.out_credit_account_id),
               (p_amount, v_id, v_refs.out_debit_account_id);
        RETURN QUERY SELECT * FROM transaction_details WHERE id = v_id;
    END $$
    "#,
];

/// Apply the schema. Idempotent: tables and indexes use IF NOT EXISTS, functions and views are replaced.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), StoreError> {
    for (i, ddl) in SCHEMA.iter().enumerate() {
        tracing::debug!(step = i, "applying schema statement");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "schema up to date");
    Ok(())
}

/// Truncate every data table. Used between integration test cases.
pub async fn reset_data(pool: &PgPool) -> Result<(), StoreError> {
    let sql = format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", DATA_TABLES.join(", "));
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database when missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Query parameters such as `sslmode` carry over to the admin URL.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let (location, query) = match url.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (url, None),
    };
    let path_start = location
        .rfind('/')
        .ok_or_else(|| StoreError::Rejected("DATABASE_URL: no path".into()))?
        + 1;
    let db_name = location.get(path_start..).unwrap_or("").trim();
    let base = location.get(..path_start).unwrap_or(location);
    let admin_url = match query {
        Some(query) => format!("{}postgres?{}", base, query),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
