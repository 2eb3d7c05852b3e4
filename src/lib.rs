//! Caixa is a web dashboard for tracking the finances of a small
//! point-of-sale business.
//!
//! The server renders HTML pages directly: it signs users in against a
//! hosted identity API, reads the business' transactions from the hosted
//! table API, and aggregates them into the monthly report shown on the
//! dashboard page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Redirect, Response};
use axum_server::Handle;
use tokio::signal;

mod auth;
mod backend;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod register;
mod routing;
mod state;
mod timezone;
mod transaction;

pub use backend::BackendClient;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use state::AppState;

use crate::internal_server_error::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No session cookie was found in the request, or the hosted backend no
    /// longer accepts the stored token.
    #[error("no active session")]
    Unauthenticated,

    /// The identity provider rejected a sign-in attempt.
    ///
    /// The string is the provider's own message and is intended to be shown
    /// in the log-in form's status region.
    #[error("sign-in rejected: {0}")]
    CredentialsRejected(String),

    /// The identity provider rejected a sign-up attempt.
    ///
    /// The string is the provider's own message and is intended to be shown
    /// in the registration form's status region.
    #[error("sign-up rejected: {0}")]
    RegistrationRejected(String),

    /// The hosted backend could not be reached, or its response could not be
    /// read.
    ///
    /// The string is the transport error rendered as text. It should be
    /// logged on the server; clients only see a generic error page.
    #[error("could not reach the backend: {0}")]
    BackendUnreachable(String),

    /// The hosted backend answered with a non-success status that is not an
    /// authentication failure.
    #[error("the backend returned status {status}: {message}")]
    BackendRejected {
        /// The HTTP status code the backend answered with.
        status: u16,
        /// The response body, or a placeholder when it could not be read.
        message: String,
    },

    /// A transaction row carried an amount that does not parse as a decimal
    /// number.
    #[error("could not parse transaction amount {0:?}")]
    InvalidAmount(String),

    /// A transaction row carried a date or timestamp that does not parse.
    #[error("could not parse transaction date {0:?}")]
    InvalidDate(String),

    /// A transaction row carried a kind other than "entrada" or "saida".
    #[error("unknown transaction kind {0:?}")]
    InvalidKind(String),

    /// The configured backend base URL does not parse as a URL, or an
    /// endpoint path could not be joined onto it.
    #[error("invalid backend URL {0:?}")]
    InvalidBackendUrl(String),

    /// The configured backend API key contains characters that are not valid
    /// in an HTTP header.
    #[error("the backend API key is not a valid header value")]
    InvalidApiKey,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        tracing::error!("request to the backend failed: {value}");
        Error::BackendUnreachable(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthenticated => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Configuração de fuso horário inválida",
                fix: &format!(
                    "Não foi possível resolver o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor e use um nome de fuso horário canônico válido."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, endpoints};

    #[test]
    fn unauthenticated_redirects_to_log_in() {
        let response = Error::Unauthenticated.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::LOG_IN_VIEW);
    }

    #[test]
    fn backend_errors_render_error_page() {
        let response = Error::BackendRejected {
            status: 503,
            message: "service unavailable".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
