//! Response types
//!
//! Status codes with the semantic helpers the client needs to decide
//! whether a failure is an authentication failure, and the response
//! envelope handed back to callers.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::request::Headers;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 401 Unauthorized.
    pub const UNAUTHORIZED: Self = Self(401);
    /// 403 Forbidden.
    pub const FORBIDDEN: Self = Self(403);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns true for 401 and 403, the statuses that may trigger a refresh.
    #[must_use]
    pub const fn is_auth_failure(self) -> bool {
        self.0 == 401 || self.0 == 403
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A response received from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: Headers,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Time between sending the request and reading the full body.
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response from raw parts.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
            duration: Duration::ZERO,
        }
    }

    /// Sets the measured duration.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body is treated as JSON `null`, so `()` and `Option<T>`
    /// targets work for 204 responses.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.is_empty() {
            return serde_json::from_slice(b"null");
        }
        serde_json::from_slice(&self.body)
    }

    /// Extracts a human-readable error message from the body.
    ///
    /// Looks for a JSON `message` or `error` field first, then falls back to
    /// the raw text, then to the reason phrase.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(&self.body) {
            for key in ["message", "error"] {
                if let Some(serde_json::Value::String(message)) = map.get(key) {
                    return message.clone();
                }
            }
        }
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.status.reason_phrase().to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode::new(201).is_success());
        assert!(StatusCode::new(404).is_client_error());
        assert!(StatusCode::new(502).is_server_error());
        assert!(StatusCode::UNAUTHORIZED.is_auth_failure());
        assert!(StatusCode::FORBIDDEN.is_auth_failure());
        assert!(!StatusCode::new(404).is_auth_failure());
        assert!(!StatusCode::new(500).is_auth_failure());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::new(401).to_string(), "401 Unauthorized");
        assert_eq!(StatusCode::new(299).to_string(), "299 Unknown");
    }

    #[test]
    fn test_error_message_prefers_json_field() {
        let response = ApiResponse::new(
            422,
            Headers::new(),
            br#"{"message":"Price must be positive"}"#.to_vec(),
        );
        assert_eq!(response.error_message(), "Price must be positive");
    }

    #[test]
    fn test_error_message_falls_back_to_text_then_reason() {
        let text = ApiResponse::new(500, Headers::new(), b"boom\n".to_vec());
        assert_eq!(text.error_message(), "boom");

        let empty = ApiResponse::new(404, Headers::new(), Vec::new());
        assert_eq!(empty.error_message(), "Not Found");
    }

    #[test]
    fn test_json_on_empty_body() {
        let response = ApiResponse::new(204, Headers::new(), Vec::new());
        let value: Option<serde_json::Value> = response.json().unwrap();
        assert!(value.is_none());
    }
}
