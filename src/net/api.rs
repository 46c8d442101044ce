//! REST calls for the authentication endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Network failures, non-2xx statuses, and undecodable bodies all surface as
//! `Err(String)` so the session controller can treat them uniformly as
//! transport errors and recover locally.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{AuthStatus, CallbackExchange, LoginStart};

/// `GET` — authorization URL plus CSRF state to persist.
pub const LOGIN_ENDPOINT: &str = "/auth/login";
/// `POST` — exchange an authorization code for a credential.
pub const CALLBACK_ENDPOINT: &str = "/oauth2callback";
/// `GET` — backend verdict on the attached credential.
pub const STATUS_ENDPOINT: &str = "/auth/status";
/// `POST` — best-effort server-side session teardown.
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";

/// How the bearer credential rides on outbound requests.
///
/// Exactly one variant is active per deployment; the cookie variant attaches
/// nothing and relies on the browser sending the session cookie itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialTransport {
    /// `Authorization: Bearer <token>` header.
    #[default]
    BearerHeader,
    /// Ambient session cookie; no explicit attachment.
    Cookie,
}

impl CredentialTransport {
    /// The `Authorization` header value to attach, if any.
    pub fn authorization_value(self, credential: Option<&str>) -> Option<String> {
        match self {
            Self::BearerHeader => credential.map(|token| format!("Bearer {token}")),
            Self::Cookie => None,
        }
    }
}

/// The four network operations the session controller depends on.
///
/// Implemented by [`HttpAuthApi`] in the browser and by in-memory fakes in
/// tests, keeping the state machine free of any real transport.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// `GET /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns an error string on network failure, a non-OK status, or an
    /// undecodable body.
    async fn login_start(&self) -> Result<LoginStart, String>;

    /// `POST /oauth2callback` with `{code, state, stored_state}`.
    ///
    /// # Errors
    ///
    /// Returns an error string on network failure, a non-OK status, or an
    /// undecodable body.
    async fn exchange_code(&self, code: &str, state: &str, stored_state: &str) -> Result<CallbackExchange, String>;

    /// `GET /auth/status` with the credential attached when present.
    ///
    /// # Errors
    ///
    /// Returns an error string on network failure, a non-OK status, or an
    /// undecodable body.
    async fn auth_status(&self, credential: Option<&str>) -> Result<AuthStatus, String>;

    /// `POST /auth/logout` with the credential attached when present.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP request fails or the server
    /// responds with a non-OK status.
    async fn logout(&self, credential: Option<&str>) -> Result<(), String>;
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(endpoint: &str, status: u16) -> String {
    format!("{endpoint} failed: {status}")
}

/// [`AuthApi`] over `gloo-net` against the same-origin backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpAuthApi {
    transport: CredentialTransport,
}

impl HttpAuthApi {
    /// Create an API client using the given credential transport.
    pub fn new(transport: CredentialTransport) -> Self {
        Self { transport }
    }
}

impl AuthApi for HttpAuthApi {
    async fn login_start(&self) -> Result<LoginStart, String> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(LOGIN_ENDPOINT)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(request_failed_message(LOGIN_ENDPOINT, resp.status()));
            }
            resp.json::<LoginStart>().await.map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err("not available on server".to_owned())
        }
    }

    async fn exchange_code(&self, code: &str, state: &str, stored_state: &str) -> Result<CallbackExchange, String> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::json!({
                "code": code,
                "state": state,
                "stored_state": stored_state,
            });
            let resp = gloo_net::http::Request::post(CALLBACK_ENDPOINT)
                .json(&payload)
                .map_err(|e| e.to_string())?
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(request_failed_message(CALLBACK_ENDPOINT, resp.status()));
            }
            resp.json::<CallbackExchange>().await.map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (code, state, stored_state);
            Err("not available on server".to_owned())
        }
    }

    async fn auth_status(&self, credential: Option<&str>) -> Result<AuthStatus, String> {
        #[cfg(feature = "hydrate")]
        {
            let mut request = gloo_net::http::Request::get(STATUS_ENDPOINT);
            if let Some(value) = self.transport.authorization_value(credential) {
                request = request.header("Authorization", &value);
            }
            let resp = request.send().await.map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(request_failed_message(STATUS_ENDPOINT, resp.status()));
            }
            resp.json::<AuthStatus>().await.map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credential;
            Err("not available on server".to_owned())
        }
    }

    async fn logout(&self, credential: Option<&str>) -> Result<(), String> {
        #[cfg(feature = "hydrate")]
        {
            let mut request = gloo_net::http::Request::post(LOGOUT_ENDPOINT);
            if let Some(value) = self.transport.authorization_value(credential) {
                request = request.header("Authorization", &value);
            }
            let resp = request.send().await.map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(request_failed_message(LOGOUT_ENDPOINT, resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credential;
            Err("not available on server".to_owned())
        }
    }
}
