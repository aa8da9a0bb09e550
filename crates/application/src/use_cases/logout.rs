//! Sign-out use case.

use std::sync::Arc;

use tracing::info;

use crate::ports::{CredentialStore, CredentialStoreError, SessionStore};

/// Use case for a user-initiated sign-out.
///
/// Follows the same order as the teardown after a failed refresh, but does
/// not notify the session listener.
pub struct Logout {
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionStore>,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, session: Arc<dyn SessionStore>) -> Self {
        Self { store, session }
    }

    /// Clears the session, the stored tokens and the stored identity.
    ///
    /// # Errors
    /// Returns the first credential store failure. The session is cleared
    /// regardless.
    pub async fn execute(&self) -> Result<(), CredentialStoreError> {
        self.session.logout();
        let tokens = self.store.clear_tokens().await;
        let identity = self.store.clear_identity().await;
        tokens.and(identity)?;
        info!("Signed out");
        Ok(())
    }
}
