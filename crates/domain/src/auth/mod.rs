//! Authentication domain types

mod identity;
mod record;
mod session;
mod types;

pub use identity::{Role, UserIdentity};
pub use record::{
    CREDENTIAL_SCHEMA_VERSION, CredentialRecord, ExpiringValue, MAX_TOKEN_TTL_SECS, TokenLifetimes,
};
pub use session::Session;
pub use types::{AuthError, CredentialPair, LoginResponse, RefreshError, token_preview};
