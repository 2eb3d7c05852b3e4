//! Log-out route handler: revokes the session at the identity provider,
//! drops the session cookie and redirects the client to the log-in page.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{get_session_token, invalidate_session_cookie, sign_out},
    backend::BackendClient,
    endpoints,
};

/// The state needed to log out.
#[derive(Debug, Clone)]
pub struct LogoutState {
    /// The client for the hosted backend.
    pub backend: Arc<BackendClient>,
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for LogoutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogoutState> for Key {
    fn from_ref(state: &LogoutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Revoke the session, invalidate the session cookie and redirect the
/// client to the log-in page.
///
/// A failed revocation is logged and nothing more; the cookie is dropped
/// either way.
pub async fn get_log_out(State(state): State<LogoutState>, jar: PrivateCookieJar) -> Response {
    if let Ok(token) = get_session_token(&jar) {
        if let Err(error) = sign_out(&state.backend, &token).await {
            tracing::error!("could not sign out at the identity provider: {error}");
        }
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
