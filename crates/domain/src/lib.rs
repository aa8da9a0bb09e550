//! Backoffice Domain - Core types for the authenticated API client
//!
//! This crate defines the request/response model, the credential and
//! session types, and the client settings. All types here are pure Rust
//! with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod resource;
pub mod response;
pub mod settings;

pub use auth::{
    AuthError, CredentialPair, CredentialRecord, ExpiringValue, LoginResponse, RefreshError,
    Role, Session, TokenLifetimes, UserIdentity, token_preview,
};
pub use error::{DomainError, DomainResult};
pub use request::{ApiRequest, Header, Headers, HttpMethod, RequestBody};
pub use resource::Resource;
pub use response::{ApiResponse, StatusCode};
pub use settings::ClientSettings;
