//! Implements a struct that holds the state of the dashboard server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{auth::DEFAULT_SESSION_DURATION, backend::BackendClient};

/// The state of the dashboard server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the hosted backend's identity and table APIs.
    pub backend: Arc<BackendClient>,

    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which the session cookie is valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] around an already configured backend client.
    ///
    /// `local_timezone` should be a valid, canonical timezone name; it is
    /// used to resolve "today" when building the monthly report windows.
    pub fn new(backend: BackendClient, cookie_secret: &str, local_timezone: &str) -> Self {
        Self {
            backend: Arc::new(backend),
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
