//! Credential and authentication error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identity::{Role, UserIdentity};

/// Access and refresh token issued together by the auth service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Longer-lived credential used only to obtain a new pair
    pub refresh_token: String,
}

impl CredentialPair {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}

/// Body returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The signed-in user
    pub user: UserIdentity,
    /// Initial access token
    pub access_token: String,
    /// Initial refresh token
    pub refresh_token: String,
}

impl LoginResponse {
    /// Returns the token pair carried by this response.
    #[must_use]
    pub fn credentials(&self) -> CredentialPair {
        CredentialPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

/// Errors from the credential refresh operation.
///
/// `Clone` because one refresh outcome is handed to every request that was
/// waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// No refresh token is stored.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The auth service rejected the refresh token.
    #[error("refresh token rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the refresh endpoint.
        status: u16,
        /// Message returned by the refresh endpoint.
        message: String,
    },

    /// The refresh call did not finish in time.
    #[error("token refresh timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The refresh call failed before a response was received.
    #[error("network error during token refresh: {message}")]
    Network {
        /// Error description.
        message: String,
    },

    /// The refresh endpoint answered with something that is not a token pair.
    #[error("invalid refresh response: {message}")]
    InvalidResponse {
        /// Error description.
        message: String,
    },

    /// The new credentials could not be written to the credential store.
    #[error("failed to store refreshed credentials: {message}")]
    Store {
        /// Error description.
        message: String,
    },

    /// The refresh task panicked before it settled.
    #[error("token refresh aborted: {message}")]
    Aborted {
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// Errors from signing in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The auth service rejected the identifier/password.
    #[error("invalid credentials: {message}")]
    InvalidCredentials {
        /// Message returned by the login endpoint.
        message: String,
    },

    /// The user signed in but their role may not use the back office.
    #[error("role '{role}' is not allowed to use the back office")]
    Forbidden {
        /// The rejected role.
        role: Role,
    },

    /// The login endpoint failed for another reason.
    #[error("login failed ({status}): {message}")]
    Server {
        /// HTTP status returned by the login endpoint.
        status: u16,
        /// Message returned by the login endpoint.
        message: String,
    },

    /// The login call failed before a response was received.
    #[error("network error during login: {message}")]
    Network {
        /// Error description.
        message: String,
    },

    /// The login endpoint answered with an unexpected body.
    #[error("invalid login response: {message}")]
    InvalidResponse {
        /// Error description.
        message: String,
    },

    /// Credentials could not be persisted.
    #[error("failed to store credentials: {message}")]
    Store {
        /// Error description.
        message: String,
    },
}

/// Returns a log-safe preview of a token (first 8 chars + `...`).
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((cut, _)) if token.len() > 12 => format!("{}...", &token[..cut]),
        _ => "***".to_string(),
    }
}
