//! Process configuration read from the environment (a `.env` file is loaded first by the server).

use crate::error::ConfigError;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Connection pool sizing and recycling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(3600),
            idle_timeout: Duration::from_secs(1800),
        }
    }
}

impl PoolSettings {
    pub fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .max_lifetime(self.max_lifetime)
            .idle_timeout(self.idle_timeout)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub pool: PoolSettings,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    pub body_limit: usize,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = PoolSettings::default();

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(AppConfig {
            database_url,
            bind_addr: parse_or(
                get("BIND_ADDR"),
                "BIND_ADDR",
                SocketAddr::from(DEFAULT_BIND_ADDR),
            )?,
            pool: PoolSettings {
                max_connections: parse_or(
                    get("DB_MAX_CONNECTIONS"),
                    "DB_MAX_CONNECTIONS",
                    defaults.max_connections,
                )?,
                min_connections: parse_or(
                    get("DB_MIN_CONNECTIONS"),
                    "DB_MIN_CONNECTIONS",
                    defaults.min_connections,
                )?,
                max_lifetime: Duration::from_secs(parse_or(
                    get("DB_MAX_LIFETIME_SECS"),
                    "DB_MAX_LIFETIME_SECS",
                    defaults.max_lifetime.as_secs(),
                )?),
                idle_timeout: Duration::from_secs(parse_or(
                    get("DB_IDLE_TIMEOUT_SECS"),
                    "DB_IDLE_TIMEOUT_SECS",
                    defaults.idle_timeout.as_secs(),
                )?),
            },
            jwt_secret,
            session_ttl: Duration::from_secs(parse_or(
                get("SESSION_TTL_SECS"),
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            body_limit: parse_or(
                get("BODY_LIMIT_BYTES"),
                "BODY_LIMIT_BYTES",
                DEFAULT_BODY_LIMIT_BYTES,
            )?,
            run_migrations: parse_or(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
