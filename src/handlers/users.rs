//! POST /users, POST /login

use crate::auth::{hash_password, session_cookie, verify_password};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::models::{CreateUserRequest, LoginRequest, NewUser};
use crate::response::{success_one, success_one_ok};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct LoginDetail {
    uuid: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let signup = req.validate()?;
    let password_hash = hash_password(signup.password, state.auth.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(&NewUser {
            email: signup.email,
            password_hash,
        })
        .await?;
    tracing::info!(uuid = %user.uuid, "user created");
    Ok(success_one(user))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = req.validate()?;
    let Some(credentials) = state.store.get_credentials(&attempt.email).await? else {
        verify_password(attempt.password, state.auth.dummy_hash.clone()).await?;
        tracing::info!("login for unknown email");
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(attempt.password, credentials.password).await? {
        tracing::info!(uuid = %credentials.uuid, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .auth
        .keys
        .issue(credentials.uuid, state.auth.session_ttl)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let jar = jar.add(session_cookie(token, state.auth.session_ttl));
    tracing::info!(uuid = %credentials.uuid, "session issued");
    Ok((
        jar,
        success_one_ok(LoginDetail {
            uuid: credentials.uuid,
        }),
    ))
}
