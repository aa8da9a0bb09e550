//! Wiring and command execution.

use std::error::Error;
use std::sync::Arc;

use backoffice_application::{
    ApplicationError, AuthenticatedClient, Login, LoginInput, Logout, RefreshCoordinator,
    ResourceApi, RestoreSession, RetryExclusions, SessionState,
};
use backoffice_domain::{ClientSettings, UserIdentity};
use backoffice_infrastructure::{
    FileCredentialStore, HttpAuthService, ReqwestTransport, SystemClock, TokioFileSystem,
    credentials_path,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::Command;

type CommandResult = Result<(), Box<dyn Error>>;

/// Every service a command may need, built once per run.
pub struct Context {
    store: Arc<FileCredentialStore<TokioFileSystem>>,
    session: Arc<SessionState>,
    auth: Arc<HttpAuthService>,
    refresh: Arc<RefreshCoordinator>,
    resources: ResourceApi,
}

impl Context {
    /// Builds the object graph from the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport, credential path or exclusion
    /// patterns cannot be set up.
    pub fn new(settings: &ClientSettings) -> Result<Self, Box<dyn Error>> {
        let path = credentials_path(settings)?;
        debug!(path = %path.display(), "Using credential file");

        let transport = Arc::new(ReqwestTransport::new(settings)?);
        let auth = Arc::new(HttpAuthService::new(transport.clone(), settings));
        let store = Arc::new(FileCredentialStore::new(
            TokioFileSystem::new(),
            path,
            settings.token_lifetimes(),
            Arc::new(SystemClock::new()),
        ));
        let session = Arc::new(SessionState::new());
        let refresh = Arc::new(RefreshCoordinator::with_timeout(
            store.clone(),
            session.clone(),
            auth.clone(),
            Arc::new(|| eprintln!("Session expired. Run `backoffice login` to sign in again.")),
            settings.refresh_timeout(),
        ));
        let client = Arc::new(AuthenticatedClient::new(
            transport,
            store.clone(),
            refresh.clone(),
            RetryExclusions::from_settings(settings)?,
        ));

        Ok(Self {
            store,
            session,
            auth,
            refresh,
            resources: ResourceApi::new(client),
        })
    }

    async fn restore(&self) -> Result<Option<UserIdentity>, ApplicationError> {
        RestoreSession::new(
            self.store.clone(),
            self.session.clone(),
            self.refresh.clone(),
        )
        .execute()
        .await
    }

    async fn require_session(&self) -> Result<UserIdentity, ApplicationError> {
        self.restore().await?.ok_or(ApplicationError::NotSignedIn)
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns the first error of the command.
    pub async fn execute(&self, command: Command) -> CommandResult {
        match command {
            Command::Login {
                identifier,
                password,
            } => {
                let login = Login::new(self.auth.clone(), self.store.clone(), self.session.clone());
                let user = login
                    .execute(LoginInput {
                        identifier,
                        password,
                    })
                    .await?;
                println!("Signed in as {} ({})", user.display_name(), user.role);
            }
            Command::Logout => {
                Logout::new(self.store.clone(), self.session.clone())
                    .execute()
                    .await?;
                println!("Signed out");
            }
            Command::Whoami => match self.restore().await? {
                Some(user) => println!("{} <{}> ({})", user.display_name(), user.email, user.role),
                None => println!("Not signed in"),
            },
            Command::List { resource, query } => {
                self.require_session().await?;
                let query: Vec<(&str, &str)> = query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let items: Value = self.resources.list_with_query(resource, &query).await?;
                print_json(&items)?;
            }
            Command::Get { resource, id } => {
                self.require_session().await?;
                let item: Value = self.resources.get(resource, &id).await?;
                print_json(&item)?;
            }
            Command::Delete { resource, id } => {
                self.require_session().await?;
                self.resources.delete(resource, &id).await?;
                println!("Deleted {resource}/{id}");
            }
        }
        Ok(())
    }
}

fn print_json(value: &Value) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
