//! Single-flight credential refresh.
//!
//! The first request that sees an authentication failure starts a refresh;
//! every request that fails while it is running awaits the same operation
//! and gets the same outcome. The pending slot is cleared when the refresh
//! settles, so the next failure starts a fresh attempt. A panic inside the
//! refresh settles it as `RefreshError::Aborted`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use backoffice_domain::{CredentialPair, RefreshError, token_preview};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::ports::{AuthService, CredentialStore, SessionListener, SessionStore};

/// Upper bound for one refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

type RefreshOutcome = Result<CredentialPair, RefreshError>;
type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Owns the one optional in-flight refresh.
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionStore>,
    auth: Arc<dyn AuthService>,
    listener: Arc<dyn SessionListener>,
    timeout: Duration,
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator with the default refresh timeout.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn SessionStore>,
        auth: Arc<dyn AuthService>,
        listener: Arc<dyn SessionListener>,
    ) -> Self {
        Self::with_timeout(store, session, auth, listener, DEFAULT_REFRESH_TIMEOUT)
    }

    /// Creates a coordinator with a custom refresh timeout.
    pub fn with_timeout(
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn SessionStore>,
        auth: Arc<dyn AuthService>,
        listener: Arc<dyn SessionListener>,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                session,
                auth,
                listener,
                timeout,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Returns true while a refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.pending.lock().is_some()
    }

    /// Starts a refresh, or joins the one already in flight.
    ///
    /// On success the new pair is already stored and the session updated.
    /// On failure the session has been torn down and the listener notified
    /// exactly once, however many callers joined.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure, shared by every caller of this attempt.
    pub async fn start_or_join(&self) -> Result<CredentialPair, RefreshError> {
        let pending = {
            let mut slot = self.inner.pending.lock();
            if let Some(pending) = slot.as_ref() {
                debug!("Joining in-flight credential refresh");
                pending.clone()
            } else {
                debug!("Starting credential refresh");
                let pending = Arc::clone(&self.inner).run().boxed().shared();
                *slot = Some(pending.clone());
                pending
            }
        };
        pending.await
    }
}

impl Inner {
    async fn run(self: Arc<Self>) -> RefreshOutcome {
        let exchanged = AssertUnwindSafe(self.exchange())
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(RefreshError::Aborted {
                    message: panic_message(payload.as_ref()),
                })
            });
        let outcome = match exchanged {
            Ok(credentials) => {
                info!(
                    access_token = %token_preview(&credentials.access_token),
                    "Credentials refreshed"
                );
                Ok(credentials)
            }
            Err(error) => {
                warn!(%error, "Credential refresh failed, ending session");
                self.tear_down().await;
                Err(error)
            }
        };
        self.pending.lock().take();
        outcome
    }

    async fn exchange(&self) -> RefreshOutcome {
        let refresh_token = self
            .store
            .refresh_token()
            .await
            .map_err(|e| RefreshError::Store {
                message: e.to_string(),
            })?
            .ok_or(RefreshError::MissingRefreshToken)?;

        let credentials = tokio::time::timeout(self.timeout, self.auth.refresh(&refresh_token))
            .await
            .map_err(|_| RefreshError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        self.store
            .save_tokens(&credentials)
            .await
            .map_err(|e| RefreshError::Store {
                message: e.to_string(),
            })?;
        self.session.set_credentials(credentials.clone());
        Ok(credentials)
    }

    /// Session, then tokens, then identity, then the listener.
    async fn tear_down(&self) {
        self.session.logout();
        if let Err(error) = self.store.clear_tokens().await {
            warn!(%error, "Failed to delete stored tokens");
        }
        if let Err(error) = self.store.clear_identity().await {
            warn!(%error, "Failed to delete stored identity");
        }
        self.listener.on_session_expired();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "refresh task panicked".to_string())
}
