//! Backoffice Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestTransport, SystemClock};
pub use auth::HttpAuthService;
pub use config::{ConfigError, credentials_path, load_settings, load_settings_from};
pub use persistence::{
    FileCredentialStore, FileSystem, FileSystemError, TokioFileSystem, default_credentials_path,
};
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
