//! Client Settings Domain Model
//!
//! Everything the authenticated client needs to know about the remote API
//! and the credential store.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::{MAX_TOKEN_TTL_SECS, TokenLifetimes};
use crate::error::{DomainError, DomainResult};

/// Settings for the back-office API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the REST API (e.g. `https://api.maison.test/api`).
    pub base_url: String,
    /// Path of the login endpoint, relative to `base_url`.
    pub login_path: String,
    /// Path of the refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Upper bound for one refresh call, in milliseconds.
    pub refresh_timeout_ms: u64,
    /// Lifetime of the stored access token, in seconds.
    pub access_token_ttl_secs: i64,
    /// Lifetime of the stored refresh token, in seconds.
    pub refresh_token_ttl_secs: i64,
    /// Where the credential file lives. `None` means the platform default.
    pub credentials_path: Option<PathBuf>,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Regex patterns of request paths that never trigger a refresh.
    /// Empty means "the login and refresh paths".
    pub retry_exclusions: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            login_path: "/auth/login".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            refresh_timeout_ms: 10_000,
            access_token_ttl_secs: 86_400,
            refresh_token_ttl_secs: 604_800,
            credentials_path: None,
            user_agent: concat!("backoffice/", env!("CARGO_PKG_VERSION")).to_string(),
            retry_exclusions: Vec::new(),
        }
    }
}

impl ClientSettings {
    /// Creates default settings pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns the refresh timeout.
    #[must_use]
    pub const fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    /// Returns the lifetimes of the two token slots.
    #[must_use]
    pub const fn token_lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes::from_secs(self.access_token_ttl_secs, self.refresh_token_ttl_secs)
    }

    /// Parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not http(s).
    pub fn parsed_base_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {}",
                url.scheme(),
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> DomainResult<()> {
        self.parsed_base_url()?;
        for (name, path) in [
            ("login_path", &self.login_path),
            ("refresh_path", &self.refresh_path),
        ] {
            if !path.starts_with('/') {
                return Err(DomainError::InvalidSetting {
                    name,
                    reason: format!("'{path}' must start with '/'"),
                });
            }
        }
        if self.refresh_timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                name: "refresh_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        for (name, secs) in [
            ("access_token_ttl_secs", self.access_token_ttl_secs),
            ("refresh_token_ttl_secs", self.refresh_token_ttl_secs),
        ] {
            if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
                return Err(DomainError::InvalidSetting {
                    name,
                    reason: format!("{secs} is outside 1..={MAX_TOKEN_TTL_SECS}"),
                });
            }
        }
        Ok(())
    }
}
