//! Rebuilds the session from persisted credentials on start-up.

use std::sync::Arc;

use backoffice_domain::{CredentialPair, UserIdentity};
use tracing::{debug, info};

use crate::auth::RefreshCoordinator;
use crate::error::{ApiError, ApplicationResult};
use crate::ports::{CredentialStore, SessionStore};

/// Use case for restoring a previous sign-in.
pub struct RestoreSession {
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionStore>,
    refresh: Arc<RefreshCoordinator>,
}

impl RestoreSession {
    /// Creates a new `RestoreSession` use case.
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn SessionStore>,
        refresh: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            store,
            session,
            refresh,
        }
    }

    /// Restores the session if a usable sign-in was persisted.
    ///
    /// Returns the signed-in user, or `None` when the user has to sign in.
    /// A stored identity without a live refresh token, or with a role that
    /// may not use the back office, is discarded. When only the access
    /// token has expired, a refresh is run first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or the refresh fails.
    pub async fn execute(&self) -> ApplicationResult<Option<UserIdentity>> {
        let Some(user) = self.store.identity().await? else {
            debug!("No stored identity");
            return Ok(None);
        };
        let refresh_token = self.store.refresh_token().await?;
        let Some(refresh_token) =
            refresh_token.filter(|_| user.role.can_access_back_office())
        else {
            debug!(user = %user.email, "Stored sign-in is no longer usable");
            self.store.clear_tokens().await?;
            self.store.clear_identity().await?;
            return Ok(None);
        };

        let credentials = match self.store.access_token().await? {
            Some(access_token) => CredentialPair::new(access_token, refresh_token),
            None => self
                .refresh
                .start_or_join()
                .await
                .map_err(ApiError::from)?,
        };
        self.session.login(user.clone(), credentials);
        info!(user = %user.email, "Session restored");
        Ok(Some(user))
    }
}
