//! Middleware that gates pages behind an active session.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{AppState, auth::cookie::get_session_token, endpoints};

/// The state needed for the session middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a session cookie.
///
/// The session token is placed into the request and then the request is
/// executed normally if the cookie is present, otherwise the client is
/// redirected to the log-in page. The log-in page itself is never behind
/// this middleware, so visitors already there are not redirected again.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(token): Extension<SessionToken>` to receive the session token.
pub async fn session_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
        }
    };

    let token = match get_session_token(&jar) {
        Ok(token) => token,
        Err(_) => return Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
    };

    parts.extensions.insert(token);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
