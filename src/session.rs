//! Cookie-carried login state.
//!
//! The cookie holds nothing but the percent-encoded username and is trusted
//! as-is; there is no signature and no server-side record of issued cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

pub const USER: &str = "user";
pub const LIFETIME: Duration = Duration::hours(24);

/// Builds the session cookie for `username`.
pub fn cookie(username: &str) -> Cookie<'static> {
    Cookie::build((USER, urlencoding::encode(username).into_owned()))
        .path("/")
        .http_only(true)
        .expires(OffsetDateTime::now_utc() + LIFETIME)
        .build()
}

pub fn issue(jar: CookieJar, username: &str) -> CookieJar {
    jar.add(cookie(username))
}

pub fn resolve(jar: &CookieJar) -> Option<String> {
    let cookie = jar.get(USER)?;
    let username = urlencoding::decode(cookie.value()).ok()?;
    if username.is_empty() {
        return None;
    }
    Some(username.into_owned())
}
