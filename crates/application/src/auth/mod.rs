//! Session and credential management.
//!
//! This module provides:
//! - The single-flight refresh coordinator
//! - The watchable global session state
//! - An in-memory credential store with per-slot expiry

mod memory_store;
mod refresh;
mod session_state;

pub use memory_store::MemoryCredentialStore;
pub use refresh::{DEFAULT_REFRESH_TIMEOUT, RefreshCoordinator};
pub use session_state::SessionState;
