//! Application error types

use backoffice_domain::{AuthError, DomainError, RefreshError, StatusCode};
use thiserror::Error;

use crate::ports::{CredentialStoreError, TransportError};

/// Errors surfaced to callers of the authenticated client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status that was not recovered.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Message extracted from the response body.
        message: String,
        /// Raw response body.
        body: Vec<u8>,
    },

    /// The credential refresh failed, so the request could not be recovered.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// No HTTP response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(#[from] DomainError),
}

impl ApiError {
    /// Returns the HTTP status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the session could not be restored and the user has
    /// to sign in again.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Refresh(_))
    }
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Signing in failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The credential store failed.
    #[error("credential store error: {0}")]
    Store(#[from] CredentialStoreError),

    /// A retry exclusion pattern is not a valid regular expression.
    #[error("invalid retry exclusion pattern: {0}")]
    InvalidPattern(String),

    /// There is no signed-in user.
    #[error("not signed in")]
    NotSignedIn,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
