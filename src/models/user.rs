use crate::error::AppError;
use crate::service::RequestValidator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;
/// bcrypt ignores input past 72 bytes, so the limit is in bytes rather than characters.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Public view of a user. The password hash never leaves the store.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub uuid: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Stored login secret for one user.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Credentials {
    pub uuid: Uuid,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated email and raw password.
#[derive(Debug)]
pub struct SignUp {
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<SignUp, AppError> {
        let mut v = RequestValidator::new();
        v.required("email", &self.email);
        v.email("email", self.email.as_deref());
        if v.required("password", &self.password) {
            v.min_len("password", self.password.as_deref(), MIN_PASSWORD_LEN);
            v.max_bytes("password", self.password.as_deref(), MAX_PASSWORD_BYTES);
        }
        v.finish()?;
        Ok(SignUp {
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<SignUp, AppError> {
        let mut v = RequestValidator::new();
        v.required("email", &self.email);
        v.email("email", self.email.as_deref());
        v.required("password", &self.password);
        v.finish()?;
        Ok(SignUp {
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}
