//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod auth_service;
mod clock;
mod credential_store;
mod http_transport;
mod session_listener;
mod session_store;

pub use auth_service::AuthService;
pub use clock::Clock;
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use http_transport::{HttpTransport, TransportError};
pub use session_listener::SessionListener;
pub use session_store::SessionStore;
