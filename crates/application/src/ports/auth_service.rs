//! Remote authentication service port

use async_trait::async_trait;
use backoffice_domain::{AuthError, CredentialPair, LoginResponse, RefreshError};

/// The two operations consumed from the authentication service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges an identifier and password for a user and a token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the service rejects the
    /// pair, or another variant for server and network failures.
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Exchanges a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError::Rejected` when the refresh token is invalid or
    /// expired.
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError>;
}
