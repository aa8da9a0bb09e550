//! Outbound request descriptor

use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use super::{AUTHORIZATION, HttpMethod, Headers, RequestBody};
use crate::error::{DomainError, DomainResult};

/// Describes one call against the remote API.
///
/// The `retried` marker is one-shot: once set it stays set for the life of
/// the descriptor, and it is what stops a request from going through the
/// refresh cycle twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Identifier used to correlate log lines for this call
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the API base URL (e.g. `/products`)
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// HTTP headers
    pub headers: Headers,
    /// Request body
    pub body: RequestBody,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
    retried: bool,
}

impl ApiRequest {
    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Headers::new(),
            body: RequestBody::Empty,
            timeout: None,
            retried: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a header, replacing any existing value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        self.body = RequestBody::json(value)?;
        Ok(self)
    }

    /// Sets a timeout for this request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches `token` as the bearer credential, replacing any previous one.
    pub fn set_bearer(&mut self, token: &str) {
        self.headers.set(AUTHORIZATION, format!("Bearer {token}"));
    }

    /// Returns the bearer token carried by this request, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    /// Returns true if this descriptor already went through a refresh retry.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    /// Marks the descriptor as retried. There is no way to unset it.
    pub const fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Returns the path with the encoded query string appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be URL-encoded.
    pub fn path_and_query(&self) -> DomainResult<String> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let encoded = serde_urlencoded::to_string(&self.query)
            .map_err(|e| DomainError::InvalidUrl(e.to_string()))?;
        let separator = if self.path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{separator}{encoded}", self.path))
    }
}
