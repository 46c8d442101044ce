//! Wire DTOs for the authentication endpoints.
//!
//! DESIGN
//! ======
//! Field names mirror the backend contract and must stay stable. Every
//! optional field defaults on deserialization so a malformed or truncated
//! response decodes into a value the caller treats as a failure, instead of
//! breaking the whole response (malformed shapes are handled like transport
//! errors).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Response of `GET /auth/login`: where to send the user, plus the one-time
/// CSRF state to persist before redirecting.
///
/// The backend signals failure with an empty object, so both fields are
/// optional and [`LoginStart::into_redirect`] collapses the incomplete case.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginStart {
    /// Identity provider authorization URL.
    #[serde(default)]
    pub auth_url: Option<String>,
    /// Backend-generated CSRF state for the redirect round trip.
    #[serde(default)]
    pub state: Option<String>,
}

impl LoginStart {
    /// The `(auth_url, state)` pair, or `None` for the failure shape.
    pub fn into_redirect(self) -> Option<(String, String)> {
        Some((self.auth_url?, self.state?))
    }
}

/// Response of `POST /oauth2callback`: the code-for-credential exchange.
///
/// In the cookie deployment `access_token` is absent even on success; the
/// session rides on the ambient cookie instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackExchange {
    /// Whether the exchange succeeded.
    #[serde(default)]
    pub success: bool,
    /// Bearer credential, when the deployment delivers tokens in the body.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Backend-reported failure reason.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /auth/status`: the backend's verdict on the attached
/// credential.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthStatus {
    /// Whether the attached credential (or ambient cookie) is valid.
    #[serde(default)]
    pub authenticated: bool,
    /// Profile of the authenticated user, when available.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Authenticated user profile as reported by `GET /auth/status`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Avatar image URL, if available.
    #[serde(default)]
    pub picture: Option<String>,
}
