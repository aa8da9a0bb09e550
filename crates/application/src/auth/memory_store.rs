//! In-memory credential store with expiry tracking.

use std::sync::Arc;

use async_trait::async_trait;
use backoffice_domain::{CredentialPair, CredentialRecord, TokenLifetimes, UserIdentity};
use tokio::sync::RwLock;

use crate::ports::{Clock, CredentialStore, CredentialStoreError};

/// Thread-safe in-memory credential store.
///
/// Nothing survives the process; use it for tests and embedding.
pub struct MemoryCredentialStore {
    record: RwLock<CredentialRecord>,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl MemoryCredentialStore {
    /// Creates an empty store with the default token lifetimes.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_lifetimes(clock, TokenLifetimes::default())
    }

    /// Creates an empty store with custom token lifetimes.
    #[must_use]
    pub fn with_lifetimes(clock: Arc<dyn Clock>, lifetimes: TokenLifetimes) -> Self {
        Self {
            record: RwLock::new(CredentialRecord::default()),
            lifetimes,
            clock,
        }
    }

    /// Returns a copy of everything stored, expired slots included.
    pub async fn record(&self) -> CredentialRecord {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        let now = self.clock.now();
        Ok(self.record.read().await.access_token(now).map(String::from))
    }

    async fn refresh_token(&self) -> Result<Option<String>, CredentialStoreError> {
        let now = self.clock.now();
        Ok(self.record.read().await.refresh_token(now).map(String::from))
    }

    async fn save_tokens(&self, credentials: &CredentialPair) -> Result<(), CredentialStoreError> {
        let now = self.clock.now();
        self.record
            .write()
            .await
            .replace_tokens(credentials, self.lifetimes, now);
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<(), CredentialStoreError> {
        self.record.write().await.clear_tokens();
        Ok(())
    }

    async fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError> {
        Ok(self.record.read().await.user.clone())
    }

    async fn save_identity(&self, user: &UserIdentity) -> Result<(), CredentialStoreError> {
        self.record.write().await.user = Some(user.clone());
        Ok(())
    }

    async fn clear_identity(&self) -> Result<(), CredentialStoreError> {
        self.record.write().await.user = None;
        Ok(())
    }
}
