//! Paths that never go through refresh-and-retry.

use backoffice_domain::ClientSettings;
use regex::RegexSet;

use crate::error::{ApplicationError, ApplicationResult};

/// Request paths whose 401/403 responses are returned as they are.
///
/// By default these are the login and refresh endpoints, so a failing
/// refresh never triggers another refresh and a failed login is never
/// retried.
#[derive(Debug, Clone)]
pub struct RetryExclusions {
    set: RegexSet,
}

impl RetryExclusions {
    /// Builds the exclusions from regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidPattern` if a pattern does not compile.
    pub fn new<I, S>(patterns: I) -> ApplicationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = RegexSet::new(patterns)
            .map_err(|e| ApplicationError::InvalidPattern(e.to_string()))?;
        Ok(Self { set })
    }

    /// Excludes exactly the given paths (a trailing slash is tolerated).
    ///
    /// # Errors
    ///
    /// Returns an error only if the resulting set exceeds the regex size limit.
    pub fn for_paths<I, S>(paths: I) -> ApplicationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(paths.into_iter().map(|path| {
            let path = path.as_ref().trim_end_matches('/');
            format!("^{}/?$", regex::escape(path))
        }))
    }

    /// Uses `retry_exclusions` from the settings, or the login and refresh
    /// paths when none are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern does not compile.
    pub fn from_settings(settings: &ClientSettings) -> ApplicationResult<Self> {
        if settings.retry_exclusions.is_empty() {
            Self::for_paths([&settings.login_path, &settings.refresh_path])
        } else {
            Self::new(&settings.retry_exclusions)
        }
    }

    /// Returns true if a request to `path` must not be refreshed and retried.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        self.set.is_match(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions_cover_auth_endpoints() {
        let exclusions = RetryExclusions::from_settings(&ClientSettings::default()).unwrap();

        assert!(exclusions.is_excluded("/auth/login"));
        assert!(exclusions.is_excluded("/auth/refresh/"));
        assert!(exclusions.is_excluded("/auth/refresh?source=cli"));
        assert!(!exclusions.is_excluded("/orders"));
        assert!(!exclusions.is_excluded("/auth/login-history"));
    }

    #[test]
    fn test_paths_are_matched_literally() {
        let exclusions = RetryExclusions::for_paths(["/v1/auth.sign-in"]).unwrap();

        assert!(exclusions.is_excluded("/v1/auth.sign-in"));
        assert!(!exclusions.is_excluded("/v1/authXsign-in"));
    }

    #[test]
    fn test_configured_patterns_replace_defaults() {
        let settings = ClientSettings {
            retry_exclusions: vec!["^/session/".to_string()],
            ..ClientSettings::default()
        };
        let exclusions = RetryExclusions::from_settings(&settings).unwrap();

        assert!(exclusions.is_excluded("/session/new"));
        assert!(!exclusions.is_excluded("/auth/login"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = RetryExclusions::new(["(unclosed"]);
        assert!(matches!(result, Err(ApplicationError::InvalidPattern(_))));
    }
}
