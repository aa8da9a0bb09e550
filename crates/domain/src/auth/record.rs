//! Persisted credential record with per-slot expiry

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::identity::UserIdentity;
use super::types::CredentialPair;

/// Current on-disk schema version.
pub const CREDENTIAL_SCHEMA_VERSION: u32 = 1;

/// Longest accepted token lifetime: 10 years.
pub const MAX_TOKEN_TTL_SECS: i64 = 315_360_000;

/// How long each stored token slot stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    /// Lifetime of the access token slot.
    pub access: Duration,
    /// Lifetime of the refresh token slot.
    pub refresh: Duration,
}

impl TokenLifetimes {
    /// Creates lifetimes from seconds, clamped to `0..=MAX_TOKEN_TTL_SECS`.
    #[must_use]
    pub const fn from_secs(access_secs: i64, refresh_secs: i64) -> Self {
        Self {
            access: Duration::seconds(clamp_ttl(access_secs)),
            refresh: Duration::seconds(clamp_ttl(refresh_secs)),
        }
    }
}

const fn clamp_ttl(secs: i64) -> i64 {
    if secs < 0 {
        0
    } else if secs > MAX_TOKEN_TTL_SECS {
        MAX_TOKEN_TTL_SECS
    } else {
        secs
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        // 1 day for access, 7 days for refresh.
        Self::from_secs(86_400, 604_800)
    }
}

/// A stored value that stops being readable after `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringValue {
    /// The stored value
    pub value: String,
    /// When the value stops being readable
    pub expires_at: DateTime<Utc>,
}

impl ExpiringValue {
    /// Creates a value that expires `lifetime` after `now`.
    ///
    /// An expiry past the representable range saturates.
    #[must_use]
    pub fn new(value: impl Into<String>, now: DateTime<Utc>, lifetime: Duration) -> Self {
        let expires_at = now.checked_add_signed(lifetime).unwrap_or_else(|| {
            if lifetime < Duration::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }
        });
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Returns the value if it has not expired at `now`.
    #[must_use]
    pub fn live(&self, now: DateTime<Utc>) -> Option<&str> {
        (now < self.expires_at).then_some(self.value.as_str())
    }
}

/// Everything the credential store keeps: two token slots and the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Access token slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<ExpiringValue>,
    /// Refresh token slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<ExpiringValue>,
    /// Persisted user identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
}

impl Default for CredentialRecord {
    fn default() -> Self {
        Self {
            schema_version: CREDENTIAL_SCHEMA_VERSION,
            access_token: None,
            refresh_token: None,
            user: None,
        }
    }
}

impl CredentialRecord {
    /// Returns the access token if present and not expired.
    #[must_use]
    pub fn access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.access_token.as_ref().and_then(|slot| slot.live(now))
    }

    /// Returns the refresh token if present and not expired.
    #[must_use]
    pub fn refresh_token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.refresh_token.as_ref().and_then(|slot| slot.live(now))
    }

    /// Replaces both token slots in one step.
    pub fn replace_tokens(
        &mut self,
        credentials: &CredentialPair,
        lifetimes: TokenLifetimes,
        now: DateTime<Utc>,
    ) {
        self.access_token = Some(ExpiringValue::new(
            credentials.access_token.clone(),
            now,
            lifetimes.access,
        ));
        self.refresh_token = Some(ExpiringValue::new(
            credentials.refresh_token.clone(),
            now,
            lifetimes.refresh,
        ));
    }

    /// Removes both token slots.
    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }

    /// Drops expired slots. Returns true if anything was removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for slot in [&mut self.access_token, &mut self.refresh_token] {
            if slot.as_ref().is_some_and(|v| v.live(now).is_none()) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}
