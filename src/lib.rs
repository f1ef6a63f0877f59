//! Double-entry bookkeeping REST API: ledgers, accounts and balanced transactions over PostgreSQL.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use auth::AuthSettings;
pub use config::{AppConfig, PoolSettings};
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists, reset_data};
pub use response::{success_many, success_one, Envelope};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{PgStore, Store, StoreError};
