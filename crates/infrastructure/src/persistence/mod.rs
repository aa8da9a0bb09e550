//! File-based persistence.

mod credential_store;
mod file_system;

pub use credential_store::{FileCredentialStore, default_credentials_path};
pub use file_system::{FileSystem, FileSystemError, TokioFileSystem};
