//! Credential store port
//!
//! Two token slots with independent expiry, plus the persisted user
//! identity. Expired slots read as absent.

use async_trait::async_trait;
use backoffice_domain::{CredentialPair, UserIdentity};
use thiserror::Error;

/// Errors that can occur while reading or writing credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    /// The backing storage could not be read or written.
    #[error("I/O error: {0}")]
    Io(String),

    /// The stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for credential persistence.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the access token if one is stored and not expired.
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError>;

    /// Returns the refresh token if one is stored and not expired.
    async fn refresh_token(&self) -> Result<Option<String>, CredentialStoreError>;

    /// Replaces both token slots in a single write.
    ///
    /// # Errors
    /// Returns an error if the write fails. Neither slot changes in that case.
    async fn save_tokens(&self, credentials: &CredentialPair) -> Result<(), CredentialStoreError>;

    /// Deletes both token slots.
    async fn clear_tokens(&self) -> Result<(), CredentialStoreError>;

    /// Returns the persisted user identity.
    async fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError>;

    /// Persists the user identity.
    async fn save_identity(&self, user: &UserIdentity) -> Result<(), CredentialStoreError>;

    /// Deletes the persisted user identity.
    async fn clear_identity(&self) -> Result<(), CredentialStoreError>;
}
