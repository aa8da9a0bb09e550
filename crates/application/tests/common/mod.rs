//! Fakes shared by the application integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use backoffice_application::{
    AuthService, AuthenticatedClient, Clock, CredentialStore, CredentialStoreError,
    HttpTransport, MemoryCredentialStore, RefreshCoordinator, RetryExclusions, SessionListener,
    SessionState, SessionStore, TransportError,
};
use backoffice_domain::{
    ApiRequest, ApiResponse, AuthError, ClientSettings, CredentialPair, Headers, LoginResponse,
    RefreshError, Role, Session, UserIdentity,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Shared, ordered record of side effects.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(1_770_000_000, 0).unwrap()
    }
}

pub fn ana() -> UserIdentity {
    UserIdentity::new("u1", "ana@maison.test", Role::Admin).with_name("Ana")
}

/// Answers every request through a closure and records what was sent.
pub struct FnTransport {
    respond: Box<dyn Fn(&ApiRequest) -> (u16, String) + Send + Sync>,
    pub sent: Mutex<Vec<ApiRequest>>,
}

impl FnTransport {
    pub fn new(respond: impl Fn(&ApiRequest) -> (u16, String) + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 200 for `Bearer <token>`, 401 otherwise.
    pub fn accepting(token: &'static str) -> Self {
        Self::new(move |request| {
            if request.bearer_token() == Some(token) {
                (200, format!(r#"{{"path":"{}"}}"#, request.path))
            } else {
                (401, r#"{"message":"jwt expired"}"#.to_string())
            }
        })
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for FnTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.lock().push(request.clone());
        tokio::task::yield_now().await;
        let (status, body) = (self.respond)(request);
        Ok(ApiResponse::new(status, Headers::new(), body.into_bytes()))
    }
}

/// Auth service whose refresh sleeps, counts calls and returns a fixed outcome.
pub struct FakeAuth {
    pub refresh_calls: AtomicUsize,
    pub refresh_delay: Duration,
    pub refresh_outcome: Result<CredentialPair, RefreshError>,
    pub login_outcome: Result<LoginResponse, AuthError>,
}

impl FakeAuth {
    pub fn refreshing_to(pair: CredentialPair) -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            refresh_delay: Duration::from_millis(20),
            refresh_outcome: Ok(pair),
            login_outcome: Err(AuthError::InvalidCredentials {
                message: "not scripted".to_string(),
            }),
        }
    }

    pub fn failing_with(error: RefreshError) -> Self {
        Self {
            refresh_outcome: Err(error),
            ..Self::refreshing_to(CredentialPair::new("unused", "unused"))
        }
    }

    pub fn calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, _: &str, _: &str) -> Result<LoginResponse, AuthError> {
        self.login_outcome.clone()
    }

    async fn refresh(&self, _: &str) -> Result<CredentialPair, RefreshError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.refresh_delay).await;
        self.refresh_outcome.clone()
    }
}

/// Credential store that logs deletions and can be told to fail them.
pub struct LoggingStore {
    pub inner: MemoryCredentialStore,
    log: EventLog,
    pub fail_clear: bool,
}

#[async_trait]
impl CredentialStore for LoggingStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        self.inner.access_token().await
    }

    async fn refresh_token(&self) -> Result<Option<String>, CredentialStoreError> {
        self.inner.refresh_token().await
    }

    async fn save_tokens(&self, credentials: &CredentialPair) -> Result<(), CredentialStoreError> {
        self.log.lock().push("store.save_tokens");
        self.inner.save_tokens(credentials).await
    }

    async fn clear_tokens(&self) -> Result<(), CredentialStoreError> {
        self.log.lock().push("store.clear_tokens");
        if self.fail_clear {
            return Err(CredentialStoreError::Io("disk is read-only".to_string()));
        }
        self.inner.clear_tokens().await
    }

    async fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError> {
        self.inner.identity().await
    }

    async fn save_identity(&self, user: &UserIdentity) -> Result<(), CredentialStoreError> {
        self.inner.save_identity(user).await
    }

    async fn clear_identity(&self) -> Result<(), CredentialStoreError> {
        self.log.lock().push("store.clear_identity");
        if self.fail_clear {
            return Err(CredentialStoreError::Io("disk is read-only".to_string()));
        }
        self.inner.clear_identity().await
    }
}

/// Session state that logs logouts.
pub struct LoggingSession {
    pub inner: SessionState,
    log: EventLog,
}

impl SessionStore for LoggingSession {
    fn snapshot(&self) -> Session {
        self.inner.snapshot()
    }

    fn login(&self, user: UserIdentity, credentials: CredentialPair) {
        self.inner.login(user, credentials);
    }

    fn set_credentials(&self, credentials: CredentialPair) {
        self.log.lock().push("session.set_credentials");
        self.inner.set_credentials(credentials);
    }

    fn logout(&self) {
        self.log.lock().push("session.logout");
        self.inner.logout();
    }
}

pub struct LoggingListener {
    log: EventLog,
    pub expired: AtomicUsize,
}

impl SessionListener for LoggingListener {
    fn on_session_expired(&self) {
        self.log.lock().push("listener.session_expired");
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

/// A signed-in client wired to fakes.
pub struct World {
    pub log: EventLog,
    pub transport: Arc<FnTransport>,
    pub store: Arc<LoggingStore>,
    pub session: Arc<LoggingSession>,
    pub auth: Arc<FakeAuth>,
    pub listener: Arc<LoggingListener>,
    pub refresh: Arc<RefreshCoordinator>,
    pub client: Arc<AuthenticatedClient>,
}

impl World {
    pub fn expired_count(&self) -> usize {
        self.listener.expired.load(Ordering::SeqCst)
    }
}

pub struct WorldBuilder {
    transport: FnTransport,
    auth: FakeAuth,
    tokens: Option<CredentialPair>,
    fail_clear: bool,
}

impl WorldBuilder {
    pub fn new(transport: FnTransport, auth: FakeAuth) -> Self {
        Self {
            transport,
            auth,
            tokens: Some(CredentialPair::new("T1", "R1")),
            fail_clear: false,
        }
    }

    pub fn tokens(mut self, tokens: Option<CredentialPair>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    pub async fn build(self) -> World {
        let log: EventLog = Arc::default();
        let store = Arc::new(LoggingStore {
            inner: MemoryCredentialStore::new(Arc::new(FixedClock)),
            log: Arc::clone(&log),
            fail_clear: self.fail_clear,
        });
        let session = Arc::new(LoggingSession {
            inner: SessionState::new(),
            log: Arc::clone(&log),
        });
        store.inner.save_identity(&ana()).await.unwrap();
        if let Some(tokens) = self.tokens {
            store.inner.save_tokens(&tokens).await.unwrap();
            session.inner.login(ana(), tokens);
        }
        let listener = Arc::new(LoggingListener {
            log: Arc::clone(&log),
            expired: AtomicUsize::new(0),
        });
        let transport = Arc::new(self.transport);
        let auth = Arc::new(self.auth);
        let refresh = Arc::new(RefreshCoordinator::new(
            store.clone(),
            session.clone(),
            auth.clone(),
            listener.clone(),
        ));
        let exclusions = RetryExclusions::from_settings(&ClientSettings::default()).unwrap();
        let client = Arc::new(AuthenticatedClient::new(
            transport.clone(),
            store.clone(),
            refresh.clone(),
            exclusions,
        ));
        World {
            log,
            transport,
            store,
            session,
            auth,
            listener,
            refresh,
            client,
        }
    }
}
