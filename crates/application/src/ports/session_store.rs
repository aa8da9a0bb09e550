//! Global session state port

use backoffice_domain::{CredentialPair, Session, UserIdentity};

/// Holder of the process-wide session snapshot.
pub trait SessionStore: Send + Sync {
    /// Returns a copy of the current session.
    fn snapshot(&self) -> Session;

    /// Marks the session as signed in.
    fn login(&self, user: UserIdentity, credentials: CredentialPair);

    /// Replaces the credential fields and keeps `user` as it is.
    fn set_credentials(&self, credentials: CredentialPair);

    /// Clears the session.
    fn logout(&self);
}
