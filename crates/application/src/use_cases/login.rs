//! Sign-in use case.

use std::sync::Arc;

use backoffice_domain::{AuthError, UserIdentity};
use tracing::{info, warn};

use crate::ports::{AuthService, CredentialStore, SessionStore};

/// Input for signing in.
#[derive(Clone)]
pub struct LoginInput {
    /// E-mail or user name.
    pub identifier: String,
    /// Plain-text password.
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}

/// Use case for signing in to the back office.
pub struct Login {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionStore>,
}

impl Login {
    /// Creates a new `Login` use case.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth,
            store,
            session,
        }
    }

    /// Signs in and stores the tokens and identity.
    ///
    /// Only admin and staff users may use the back office; for anyone else
    /// nothing is stored.
    ///
    /// # Errors
    /// - `AuthError::Forbidden` if the role may not use the back office
    /// - `AuthError::Store` if the credentials cannot be persisted
    /// - any error returned by the auth service
    pub async fn execute(&self, input: LoginInput) -> Result<UserIdentity, AuthError> {
        let response = self.auth.login(&input.identifier, &input.password).await?;
        let user = response.user.clone();
        if !user.role.can_access_back_office() {
            warn!(user = %user.email, role = %user.role, "Back-office access denied");
            return Err(AuthError::Forbidden { role: user.role });
        }

        let credentials = response.credentials();
        let store_error = |e: crate::ports::CredentialStoreError| AuthError::Store {
            message: e.to_string(),
        };
        self.store
            .save_tokens(&credentials)
            .await
            .map_err(store_error)?;
        self.store.save_identity(&user).await.map_err(store_error)?;
        self.session.login(user.clone(), credentials);

        info!(user = %user.email, role = %user.role, "Signed in");
        Ok(user)
    }
}
