//! Defines functions for storing the backend session token in a cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::SessionToken};

pub(crate) const COOKIE_SESSION: &str = "session";

/// The default duration for which the session cookie is valid.
///
/// Matches the default lifetime of the access tokens the identity provider
/// issues, so the cookie and the token expire together.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::hours(1);

/// Add the session cookie to the cookie jar, indicating that a user is
/// signed in.
///
/// Sets the expiry of the cookie to `duration` from the current time. You
/// can use [DEFAULT_SESSION_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    token: &SessionToken,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((COOKIE_SESSION, token.as_str().to_owned()))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token back out of the cookie jar.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the session cookie is missing.
pub(crate) fn get_session_token(jar: &PrivateCookieJar) -> Result<SessionToken, Error> {
    jar.get(COOKIE_SESSION)
        .map(|cookie| SessionToken::new(cookie.value_trimmed()))
        .ok_or(Error::Unauthenticated)
}
