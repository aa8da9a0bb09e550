//! Use cases
//!
//! Each use case orchestrates the ports for one user-facing operation.

mod login;
mod logout;
mod restore_session;

pub use login::{Login, LoginInput};
pub use logout::Logout;
pub use restore_session::RestoreSession;
