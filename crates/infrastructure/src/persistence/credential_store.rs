//! File-based credential store.
//!
//! Tokens and identity live in one JSON file, by default
//! `<config dir>/backoffice/credentials.json`:
//! ```json
//! {
//!   "schema_version": 1,
//!   "access_token": { "value": "eyJ...", "expires_at": "2026-03-02T09:00:00Z" },
//!   "refresh_token": { "value": "eyJ...", "expires_at": "2026-03-08T09:00:00Z" },
//!   "user": { "id": "u1", "email": "ana@maison.test", "role": "admin" }
//! }
//! ```
//! The file is removed once nothing is stored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use backoffice_application::ports::{Clock, CredentialStore, CredentialStoreError};
use backoffice_domain::auth::CREDENTIAL_SCHEMA_VERSION;
use backoffice_domain::{CredentialPair, CredentialRecord, TokenLifetimes, UserIdentity};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::file_system::{FileSystem, FileSystemError};
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Returns `<config dir>/backoffice/credentials.json`.
#[must_use]
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("backoffice").join("credentials.json"))
}

/// Credential store persisted to a JSON file.
pub struct FileCredentialStore<F> {
    fs: F,
    path: PathBuf,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl<F: FileSystem> FileCredentialStore<F> {
    /// Creates a store backed by the file at `path`.
    pub fn new(
        fs: F,
        path: impl Into<PathBuf>,
        lifetimes: TokenLifetimes,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fs,
            path: path.into(),
            lifetimes,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<CredentialRecord, CredentialStoreError> {
        let bytes = match self.fs.read_file(&self.path).await {
            Ok(bytes) => bytes,
            Err(FileSystemError::NotFound(_)) => return Ok(CredentialRecord::default()),
            Err(e) => return Err(CredentialStoreError::Io(e.to_string())),
        };
        let record: CredentialRecord = match from_json_bytes(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Unreadable credential file, ignoring it"
                );
                return Ok(CredentialRecord::default());
            }
        };
        if record.schema_version > CREDENTIAL_SCHEMA_VERSION {
            return Err(CredentialStoreError::Serialization(format!(
                "unsupported schema version {} (expected <= {CREDENTIAL_SCHEMA_VERSION})",
                record.schema_version
            )));
        }
        Ok(record)
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), CredentialStoreError> {
        if record.is_empty() {
            debug!(path = %self.path.display(), "Removing credential file");
            return self
                .fs
                .remove_file(&self.path)
                .await
                .map_err(|e| CredentialStoreError::Io(e.to_string()));
        }
        let bytes = to_json_stable_bytes(record)
            .map_err(|e| CredentialStoreError::Serialization(e.to_string()))?;
        self.fs
            .write_file_atomic(&self.path, &bytes)
            .await
            .map_err(|e| CredentialStoreError::Io(e.to_string()))
    }

    async fn update(
        &self,
        change: impl FnOnce(&mut CredentialRecord) + Send,
    ) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load().await?;
        change(&mut record);
        record.purge_expired(self.clock.now());
        self.save(&record).await
    }
}

#[async_trait]
impl<F: FileSystem> CredentialStore for FileCredentialStore<F> {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        let record = self.load().await?;
        Ok(record.access_token(self.clock.now()).map(String::from))
    }

    async fn refresh_token(&self) -> Result<Option<String>, CredentialStoreError> {
        let record = self.load().await?;
        Ok(record.refresh_token(self.clock.now()).map(String::from))
    }

    async fn save_tokens(&self, credentials: &CredentialPair) -> Result<(), CredentialStoreError> {
        let now = self.clock.now();
        let lifetimes = self.lifetimes;
        self.update(|record| record.replace_tokens(credentials, lifetimes, now))
            .await
    }

    async fn clear_tokens(&self) -> Result<(), CredentialStoreError> {
        self.update(CredentialRecord::clear_tokens).await
    }

    async fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError> {
        Ok(self.load().await?.user)
    }

    async fn save_identity(&self, user: &UserIdentity) -> Result<(), CredentialStoreError> {
        self.update(|record| record.user = Some(user.clone())).await
    }

    async fn clear_identity(&self) -> Result<(), CredentialStoreError> {
        self.update(|record| record.user = None).await
    }
}
