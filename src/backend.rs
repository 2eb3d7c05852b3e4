//! The HTTP client for the hosted backend.
//!
//! The backend exposes two API families under one base URL: the identity
//! API (sign-in, sign-up, sign-out, user profile) and the table API used to
//! read transactions. The client is constructed once at start-up and
//! injected wherever those APIs are called, so the base URL, the API key and
//! the connection pool are explicit state rather than an ambient global.

use reqwest::{
    Client, Url,
    header::{HeaderMap, HeaderValue},
};

use crate::Error;

/// Path prefix of the identity API.
const AUTH_PREFIX: &str = "auth/v1";

/// Path prefix of the table API.
const REST_PREFIX: &str = "rest/v1";

/// The header carrying the project API key on every request.
const API_KEY_HEADER: &str = "apikey";

/// A handle to the hosted backend's HTTP APIs.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// `base_url` must be the backend root, e.g. `https://myproject.example.com/`.
    /// The project `api_key` is attached to every request as the `apikey`
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidBackendUrl] if `base_url` does not parse,
    /// [Error::InvalidApiKey] if `api_key` is not a valid header value, and
    /// [Error::BackendUnreachable] if the underlying HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, Error> {
        let base_url =
            Url::parse(base_url).map_err(|_| Error::InvalidBackendUrl(base_url.to_owned()))?;

        let mut api_key_value =
            HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        api_key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key_value);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }

    /// The underlying HTTP client, with the API key header preconfigured.
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The URL of an identity API operation, e.g. `token` or `logout`.
    pub(crate) fn auth_endpoint(&self, operation: &str) -> Result<Url, Error> {
        self.join(&format!("{AUTH_PREFIX}/{operation}"))
    }

    /// The URL of a table exposed by the table API.
    pub(crate) fn table_endpoint(&self, table: &str) -> Result<Url, Error> {
        self.join(&format!("{REST_PREFIX}/{table}"))
    }

    fn join(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidBackendUrl(format!("{}{path}", self.base_url)))
    }
}
