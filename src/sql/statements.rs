//! Statements issued by [crate::store::PgStore]. Values are always bound, never interpolated.

const LEDGER_COLUMNS: &str = "uuid, name, description, metadata, created_at, updated_at";

pub const INSERT_LEDGER: &str = r#"
    INSERT INTO ledgers (name, description, metadata, user_id)
    VALUES ($1, $2, $3, (SELECT id FROM users WHERE uuid = $4))
    RETURNING uuid, name, description, metadata, created_at, updated_at
"#;

pub fn select_ledger() -> String {
    format!("SELECT {} FROM ledgers WHERE uuid = $1", LEDGER_COLUMNS)
}

pub fn list_ledgers() -> String {
    format!(
        "SELECT {} FROM ledgers WHERE metadata @> $1::jsonb ORDER BY id",
        LEDGER_COLUMNS
    )
}

pub const UPDATE_LEDGER: &str = r#"
    UPDATE ledgers
       SET name = $2, description = $3, metadata = $4, updated_at = NOW()
     WHERE uuid = $1
    RETURNING uuid, name, description, metadata, created_at, updated_at
"#;

const ACCOUNT_SELECT: &str = r#"
    SELECT a.uuid, a.name, a.type, a.metadata, l.uuid AS ledger_uuid, a.created_at, a.updated_at
      FROM accounts a
      JOIN ledgers l ON l.id = a.ledger_id
"#;

/// An unknown ledger leaves `ledger_id` null and the insert fails the NOT NULL constraint.
pub const INSERT_ACCOUNT: &str = r#"
    INSERT INTO accounts (name, type, metadata, ledger_id)
    VALUES ($1, $2, $3, (SELECT id FROM ledgers WHERE uuid = $4))
    RETURNING uuid, name, type, metadata, $4::uuid AS ledger_uuid, created_at, updated_at
"#;

pub fn select_account() -> String {
    format!("{} WHERE a.uuid = $1", ACCOUNT_SELECT)
}

pub fn list_accounts() -> String {
    format!(
        "{} WHERE l.uuid = $1 AND a.metadata @> $2::jsonb ORDER BY a.id",
        ACCOUNT_SELECT
    )
}

/// The owning ledger is fixed at creation.
pub const UPDATE_ACCOUNT: &str = r#"
    UPDATE accounts a
       SET name = $2,
           type = $3,
           metadata = $4,
           updated_at = NOW()
      FROM ledgers l
     WHERE a.uuid = $1 AND l.id = a.ledger_id
    RETURNING a.uuid, a.name, a.type, a.metadata, l.uuid AS ledger_uuid, a.created_at, a.updated_at
"#;

const TRANSACTION_COLUMNS: &str = "uuid, amount, date, description, metadata, ledger_uuid, \
     credit_account_uuid, debit_account_uuid, created_at, updated_at";

pub fn insert_transaction() -> String {
    format!(
        "SELECT {} FROM create_transaction($1, $2, $3, $4, $5, $6, $7)",
        TRANSACTION_COLUMNS
    )
}

pub fn update_transaction() -> String {
    format!(
        "SELECT {} FROM update_transaction($1, $2, $3, $4, $5, $6, $7, $8)",
        TRANSACTION_COLUMNS
    )
}

pub fn select_transaction() -> String {
    format!(
        "SELECT {} FROM transaction_details WHERE uuid = $1",
        TRANSACTION_COLUMNS
    )
}

/// Newest first. `$3` limit, `$4` offset.
pub fn list_transactions() -> String {
    format!(
        "SELECT {} FROM transaction_details \
         WHERE ledger_uuid = $1 AND metadata @> $2::jsonb \
         ORDER BY date DESC, id DESC LIMIT $3 OFFSET $4",
        TRANSACTION_COLUMNS
    )
}

/// Rows matched by [list_transactions] before paging.
pub const COUNT_TRANSACTIONS: &str = "SELECT COUNT(*) FROM transaction_details \
     WHERE ledger_uuid = $1 AND metadata @> $2::jsonb";

pub const DELETE_TRANSACTION: &str = "DELETE FROM transactions WHERE uuid = $1 RETURNING uuid";

pub const INSERT_USER: &str = r#"
    INSERT INTO users (email, password)
    VALUES ($1, $2)
    RETURNING uuid, email, created_at
"#;

pub const SELECT_CREDENTIALS: &str = "SELECT uuid, password FROM users WHERE email = $1";

pub const PING: &str = "SELECT 1";
