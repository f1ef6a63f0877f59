use crate::auth::SESSION_COOKIE;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use uuid::Uuid;

/// User behind the `session` cookie, if any. A missing, invalid or expired token is anonymous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let user = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| match state.auth.keys.verify(cookie.value()) {
                Ok(claims) => Some(claims.sub),
                Err(e) => {
                    tracing::info!(error = %e, "ignoring invalid session cookie");
                    None
                }
            });
        Ok(Session(user))
    }
}
