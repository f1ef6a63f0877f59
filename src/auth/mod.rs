//! Password hashing, session tokens and the session cookie.

mod cookie;
mod password;
mod token;

pub use cookie::{session_cookie, SESSION_COOKIE};
pub use password::{hash_password, verify_password};
pub use token::{Claims, SessionKeys, TokenError};

use std::time::Duration;

/// Everything the handlers need to issue and check sessions.
#[derive(Clone)]
pub struct AuthSettings {
    pub keys: SessionKeys,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    /// Well-formed hash at the configured cost, verified when the email is unknown so both
    /// login failures take the same time.
    pub dummy_hash: String,
}

impl AuthSettings {
    pub fn new(secret: &[u8], session_ttl: Duration, bcrypt_cost: u32) -> Self {
        AuthSettings {
            keys: SessionKeys::from_secret(secret),
            session_ttl,
            bcrypt_cost,
            dummy_hash: dummy_hash(bcrypt_cost),
        }
    }
}

fn dummy_hash(cost: u32) -> String {
    format!(
        "$2b${:02}$EixZaYVK1fsbw1ZfbX3OXePaWxn96p36WQoeG6Lruj3vjPGga31lW",
        cost
    )
}
