//! The log-in page and its form handler.
//!
//! The identity provider does the actual credential check; this module only
//! relays the form, shows the provider's message in the form's status
//! region on failure, and stores the returned session token in a cookie on
//! success.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{DEFAULT_SESSION_DURATION, set_session_cookie, sign_in},
    backend::BackendClient,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, loading_spinner, log_in_register, password_input,
        status_message,
    },
    state::create_cookie_key,
};

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email))

            (password_input(0))

            @if let Some(error_message) = error_message {
                (status_message(error_message))
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Entrar"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Não tem uma conta? "
                a
                    href=(endpoints::REGISTER_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Cadastre-se aqui"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let log_in_form = log_in_form("", None);
    let content = log_in_register("Entre na sua conta", &log_in_form);
    base("Entrar", &[], &content).into_response()
}

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The client for the hosted backend.
    pub backend: Arc<BackendClient>,
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the session cookie is valid.
    pub cookie_duration: Duration,
}

impl LoginState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(backend: Arc<BackendClient>, cookie_secret: &str) -> Self {
        Self {
            backend,
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_SESSION_DURATION,
        }
    }
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// E-mail address entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in the session cookie is set and the client is
/// redirected to the dashboard page. Otherwise, the form is returned with a
/// message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let token = match sign_in(&state.backend, &user_data.email, &user_data.password).await {
        Ok(token) => token,
        Err(Error::CredentialsRejected(message)) => {
            return log_in_form(&user_data.email, Some(&message)).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while signing in: {error}");
            return log_in_form(
                &user_data.email,
                Some("Ocorreu um erro interno. Tente novamente mais tarde."),
            )
            .into_response();
        }
    };

    let jar = set_session_cookie(jar, &token, state.cookie_duration);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        jar,
    )
        .into_response()
}
