//! Watchable global session state.

use backoffice_domain::{CredentialPair, Session, UserIdentity};
use tokio::sync::watch;

use crate::ports::SessionStore;

/// Process-wide session snapshot that the host can subscribe to.
#[derive(Debug)]
pub struct SessionState {
    tx: watch::Sender<Session>,
}

impl SessionState {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx }
    }

    /// Returns a receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for SessionState {
    fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    fn login(&self, user: UserIdentity, credentials: CredentialPair) {
        self.tx.send_replace(Session::authenticated(user, credentials));
    }

    fn set_credentials(&self, credentials: CredentialPair) {
        self.tx.send_modify(|session| session.set_credentials(credentials));
    }

    fn logout(&self) {
        self.tx.send_replace(Session::default());
    }
}
