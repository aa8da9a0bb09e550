//! Global session snapshot

use serde::{Deserialize, Serialize};

use super::identity::{Role, UserIdentity};
use super::types::CredentialPair;

/// What the host application knows about the current sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in user
    pub user: Option<UserIdentity>,
    /// Current access token
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Current refresh token
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Whether the session is authenticated
    pub is_authenticated: bool,
}

impl Session {
    /// Creates an authenticated session.
    #[must_use]
    pub fn authenticated(user: UserIdentity, credentials: CredentialPair) -> Self {
        Self {
            user: Some(user),
            access_token: Some(credentials.access_token),
            refresh_token: Some(credentials.refresh_token),
            is_authenticated: true,
        }
    }

    /// Replaces the credential fields and leaves `user` untouched.
    ///
    /// The session only counts as authenticated while it has a user.
    pub fn set_credentials(&mut self, credentials: CredentialPair) {
        self.access_token = Some(credentials.access_token);
        self.refresh_token = Some(credentials.refresh_token);
        self.is_authenticated = self.user.is_some();
    }

    /// Returns true if the signed-in user has the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated && self.user.as_ref().is_some_and(|u| u.role == role)
    }

    /// Returns true if the signed-in user may use the back office.
    #[must_use]
    pub fn can_access_back_office(&self) -> bool {
        self.is_authenticated
            && self
                .user
                .as_ref()
                .is_some_and(|u| u.role.can_access_back_office())
    }
}
