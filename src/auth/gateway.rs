//! Thin wrapper over the identity provider's HTTP API.
//!
//! Each operation makes exactly one attempt. Rejections carry the
//! provider's own message so the calling form can show it to the user.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{Error, backend::BackendClient};

/// An access token for the hosted backend, issued at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw access token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for use as a bearer credential.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The details needed to register a new account with the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The e-mail address to register.
    pub email: String,
    /// The password for the new account.
    pub password: String,
    /// The name shown on the dashboard, stored as user metadata.
    pub display_name: String,
}

/// The signed-in user's profile as reported by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// The display name from the user metadata, if one was set at sign-up.
    pub display_name: Option<String>,
    /// The account's e-mail address.
    pub email: String,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: DisplayNameMetadata<'a>,
}

#[derive(Serialize)]
struct DisplayNameMetadata<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    name: Option<String>,
}

#[derive(Deserialize)]
struct UserResponse {
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

/// The error payload shapes the identity API uses across its endpoints.
#[derive(Deserialize, Default)]
struct ProviderError {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

/// Exchange an e-mail and password for a session token.
///
/// # Errors
///
/// Returns [Error::CredentialsRejected] with the provider's message when the
/// credentials are not accepted, and [Error::BackendUnreachable] when the
/// provider cannot be reached.
pub async fn sign_in(
    backend: &BackendClient,
    email: &str,
    password: &str,
) -> Result<SessionToken, Error> {
    let url = backend.auth_endpoint("token")?;
    let response = backend
        .http()
        .post(url)
        .query(&[("grant_type", "password")])
        .json(&CredentialsRequest { email, password })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::CredentialsRejected(provider_message(response).await));
    }

    let TokenResponse { access_token } = response.json().await?;

    Ok(SessionToken::new(access_token))
}

/// Register a new account with the identity provider.
///
/// The display name is stored as user metadata so [current_user] can report
/// it back later.
///
/// # Errors
///
/// Returns [Error::RegistrationRejected] with the provider's message when
/// the sign-up is not accepted.
pub async fn sign_up(backend: &BackendClient, account: &NewAccount) -> Result<(), Error> {
    let url = backend.auth_endpoint("signup")?;
    let response = backend
        .http()
        .post(url)
        .json(&SignUpRequest {
            email: &account.email,
            password: &account.password,
            data: DisplayNameMetadata {
                name: &account.display_name,
            },
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::RegistrationRejected(provider_message(response).await));
    }

    Ok(())
}

/// Revoke the session at the identity provider.
///
/// The caller decides whether a failure matters; dropping the local cookie
/// does not depend on this call succeeding.
pub async fn sign_out(backend: &BackendClient, token: &SessionToken) -> Result<(), Error> {
    let url = backend.auth_endpoint("logout")?;
    let response = backend
        .http()
        .post(url)
        .bearer_auth(token.as_str())
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::BackendRejected {
            status: response.status().as_u16(),
            message: provider_message(response).await,
        });
    }

    Ok(())
}

/// Fetch the signed-in user's profile.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] when the provider no longer accepts the
/// token, e.g. after it expired.
pub async fn current_user(
    backend: &BackendClient,
    token: &SessionToken,
) -> Result<UserProfile, Error> {
    let url = backend.auth_endpoint("user")?;
    let response = backend
        .http()
        .get(url)
        .bearer_auth(token.as_str())
        .send()
        .await?;

    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthenticated);
    }

    if !response.status().is_success() {
        return Err(Error::BackendRejected {
            status: response.status().as_u16(),
            message: provider_message(response).await,
        });
    }

    let user: UserResponse = response.json().await?;

    Ok(UserProfile {
        display_name: user.user_metadata.name,
        email: user.email,
    })
}

/// Pull a human-readable message out of an identity API error response.
///
/// The API is not consistent about the field name, so try each shape before
/// falling back to the status code.
async fn provider_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body: ProviderError = response.json().await.unwrap_or_default();

    body.error_description
        .or(body.msg)
        .or(body.error)
        .unwrap_or_else(|| format!("o serviço de identidade retornou o status {status}"))
}

#[cfg(test)]
mod gateway_tests {
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::json;

    use crate::{Error, backend::BackendClient};

    use super::{NewAccount, SessionToken, current_user, sign_in, sign_out, sign_up};

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn_stub_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    async fn get_test_backend(router: Router) -> BackendClient {
        let base_url = spawn_stub_backend(router).await;

        BackendClient::new(&base_url, "anon-key").expect("could not build backend client")
    }

    #[tokio::test]
    async fn sign_in_returns_session_token() {
        let router = Router::new().route(
            "/auth/v1/token",
            post(|| async {
                Json(json!({"access_token": "token-123", "token_type": "bearer"}))
            }),
        );
        let backend = get_test_backend(router).await;

        let token = sign_in(&backend, "dona@lanchonete.com", "segredo123")
            .await
            .unwrap();

        assert_eq!(token.as_str(), "token-123");
    }

    #[tokio::test]
    async fn sign_in_surfaces_provider_message() {
        let router = Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error_description": "Invalid login credentials"})),
                )
            }),
        );
        let backend = get_test_backend(router).await;

        let error = sign_in(&backend, "dona@lanchonete.com", "errada")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            Error::CredentialsRejected("Invalid login credentials".to_owned())
        );
    }

    #[tokio::test]
    async fn sign_up_accepts_created_account() {
        let router = Router::new().route(
            "/auth/v1/signup",
            post(|| async { Json(json!({"id": "abc", "email": "nova@lanchonete.com"})) }),
        );
        let backend = get_test_backend(router).await;

        let account = NewAccount {
            email: "nova@lanchonete.com".to_owned(),
            password: "segredo123".to_owned(),
            display_name: "Nova".to_owned(),
        };

        assert!(sign_up(&backend, &account).await.is_ok());
    }

    #[tokio::test]
    async fn sign_up_surfaces_provider_message() {
        let router = Router::new().route(
            "/auth/v1/signup",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"msg": "Password should be at least 6 characters"})),
                )
            }),
        );
        let backend = get_test_backend(router).await;

        let account = NewAccount {
            email: "nova@lanchonete.com".to_owned(),
            password: "123".to_owned(),
            display_name: "Nova".to_owned(),
        };

        let error = sign_up(&backend, &account).await.unwrap_err();

        assert_eq!(
            error,
            Error::RegistrationRejected("Password should be at least 6 characters".to_owned())
        );
    }

    #[tokio::test]
    async fn sign_out_succeeds_on_no_content() {
        let router = Router::new().route(
            "/auth/v1/logout",
            post(|| async { StatusCode::NO_CONTENT }),
        );
        let backend = get_test_backend(router).await;

        let result = sign_out(&backend, &SessionToken::new("token-123")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn current_user_maps_profile_metadata() {
        let router = Router::new().route(
            "/auth/v1/user",
            get(|| async {
                Json(json!({
                    "email": "dona@lanchonete.com",
                    "user_metadata": {"name": "Dona Maria"}
                }))
            }),
        );
        let backend = get_test_backend(router).await;

        let profile = current_user(&backend, &SessionToken::new("token-123"))
            .await
            .unwrap();

        assert_eq!(profile.display_name.as_deref(), Some("Dona Maria"));
        assert_eq!(profile.email, "dona@lanchonete.com");
    }

    #[tokio::test]
    async fn current_user_without_metadata_has_no_display_name() {
        let router = Router::new().route(
            "/auth/v1/user",
            get(|| async { Json(json!({"email": "dona@lanchonete.com"})) }),
        );
        let backend = get_test_backend(router).await;

        let profile = current_user(&backend, &SessionToken::new("token-123"))
            .await
            .unwrap();

        assert_eq!(profile.display_name, None);
    }

    #[tokio::test]
    async fn rejected_token_is_unauthenticated() {
        let router = Router::new().route(
            "/auth/v1/user",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"msg": "JWT expired"}))) }),
        );
        let backend = get_test_backend(router).await;

        let error = current_user(&backend, &SessionToken::new("stale-token"))
            .await
            .unwrap_err();

        assert_eq!(error, Error::Unauthenticated);
    }
}
