use axum_extra::extract::cookie::{Cookie, SameSite};
use std::time::Duration;

pub const SESSION_COOKIE: &str = "session";

pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}
