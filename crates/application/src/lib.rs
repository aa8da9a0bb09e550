//! Backoffice Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The authenticated client and its single-flight refresh
//! - Use case orchestration
//! - Application-level error handling

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod resources;
pub mod use_cases;

pub use auth::{DEFAULT_REFRESH_TIMEOUT, MemoryCredentialStore, RefreshCoordinator, SessionState};
pub use client::{AuthenticatedClient, Disposition, RetryExclusions};
pub use error::{ApiError, ApplicationError, ApplicationResult};
pub use ports::{
    AuthService, Clock, CredentialStore, CredentialStoreError, HttpTransport, SessionListener,
    SessionStore, TransportError,
};
pub use resources::ResourceApi;
pub use use_cases::{Login, LoginInput, Logout, RestoreSession};
