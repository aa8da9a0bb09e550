//! HTTP Request body types

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// Default content type for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body of an outbound API request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document, serialized when the request is sent
    Json(serde_json::Value),
    /// Pre-encoded text with an explicit content type
    Text {
        /// The content type (e.g., "text/plain")
        content_type: String,
        /// The body content
        content: String,
    },
}

impl RequestBody {
    /// Creates a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content_type: "text/plain".to_string(),
            content: content.into(),
        }
    }

    /// Returns true if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the content type implied by the body, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
            Self::Text { content_type, .. } => Some(content_type),
        }
    }

    /// Encodes the body into bytes for the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if a JSON body cannot be serialized.
    pub fn to_bytes(&self) -> DomainResult<Vec<u8>> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Json(value) => {
                serde_json::to_vec(value).map_err(|e| DomainError::InvalidBody(e.to_string()))
            }
            Self::Text { content, .. } => Ok(content.clone().into_bytes()),
        }
    }
}
