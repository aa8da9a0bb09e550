//! Authenticated API client
//!
//! Wraps an [`HttpTransport`] with two hooks:
//!
//! - [`AuthenticatedClient::before_send`] attaches the stored access token.
//! - [`AuthenticatedClient::after_receive`] decides whether a response is
//!   delivered, rejected, or recovered through the shared refresh.
//!
//! A recovered request is resubmitted once through both hooks again; its
//! retried marker keeps it from starting a second refresh.

mod exclusions;

use std::sync::Arc;

use backoffice_domain::request::{AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE};
use backoffice_domain::{ApiRequest, ApiResponse, HttpMethod, token_preview};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use exclusions::RetryExclusions;

use crate::auth::RefreshCoordinator;
use crate::error::ApiError;
use crate::ports::{CredentialStore, HttpTransport};

/// What to do with a response once it has been received.
#[derive(Debug)]
pub enum Disposition {
    /// Hand the response to the caller.
    Deliver(ApiResponse),
    /// Fail the call with this error.
    Reject(ApiError),
    /// Refresh the credentials and resubmit the request.
    RefreshAndRetry,
}

/// HTTP client that attaches bearer tokens and recovers from expired ones.
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    refresh: Arc<RefreshCoordinator>,
    exclusions: RetryExclusions,
}

impl AuthenticatedClient {
    /// Creates a client.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        refresh: Arc<RefreshCoordinator>,
        exclusions: RetryExclusions,
    ) -> Self {
        Self {
            transport,
            store,
            refresh,
            exclusions,
        }
    }

    /// Request phase: attaches the stored access token, or removes any
    /// bearer header when none is stored, and defaults the content type.
    ///
    /// A retried request keeps the refreshed token it already carries when
    /// the store has none to offer.
    pub async fn before_send(&self, request: &mut ApiRequest) {
        let token = match self.store.access_token().await {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, request_id = %request.id, "Could not read access token");
                None
            }
        };
        match token {
            Some(token) => {
                debug!(
                    request_id = %request.id,
                    token = %token_preview(&token),
                    "Attaching bearer token"
                );
                request.set_bearer(&token);
            }
            None if request.is_retried() && request.bearer_token().is_some() => {
                debug!(request_id = %request.id, "Keeping refreshed bearer token");
            }
            None => {
                debug!(request_id = %request.id, "No access token stored");
                request.headers.remove(AUTHORIZATION);
            }
        }
        if !request.headers.contains(CONTENT_TYPE) {
            let content_type = request
                .body
                .content_type()
                .unwrap_or(JSON_CONTENT_TYPE)
                .to_string();
            request.headers.set(CONTENT_TYPE, content_type);
        }
    }

    /// Response phase: classifies a received response.
    #[must_use]
    pub fn after_receive(&self, request: &ApiRequest, response: ApiResponse) -> Disposition {
        if response.is_success() {
            return Disposition::Deliver(response);
        }
        let status = response.status;
        let recoverable = status.is_auth_failure()
            && !request.is_retried()
            && !self.exclusions.is_excluded(&request.path);
        if recoverable {
            debug!(
                request_id = %request.id,
                %status,
                path = %request.path,
                "Authentication failure, refreshing credentials"
            );
            return Disposition::RefreshAndRetry;
        }
        debug!(
            request_id = %request.id,
            %status,
            path = %request.path,
            retried = request.is_retried(),
            "Request failed"
        );
        Disposition::Reject(ApiError::Status {
            status,
            message: response.error_message(),
            body: response.body,
        })
    }

    /// Sends a request, recovering once from an expired access token.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for failures that are not recovered
    /// - `ApiError::Refresh` when the credential refresh fails
    /// - `ApiError::Transport` when no response was received
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        loop {
            self.before_send(&mut request).await;
            let response = self.transport.execute(&request).await?;
            match self.after_receive(&request, response) {
                Disposition::Deliver(response) => return Ok(response),
                Disposition::Reject(error) => return Err(error),
                Disposition::RefreshAndRetry => {
                    request.mark_retried();
                    let credentials = self.refresh.start_or_join().await?;
                    request.set_bearer(&credentials.access_token);
                    debug!(request_id = %request.id, "Resubmitting with refreshed credentials");
                }
            }
        }
    }

    /// Sends a request and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Same as [`Self::send`], plus `ApiError::Decode` if the body does not
    /// match `T`.
    pub async fn send_for<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GETs `path` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::send_for`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_for(ApiRequest::get(path)).await
    }

    /// Sends `body` as JSON with the given method and decodes the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`Self::send_for`]. Also fails if `body` cannot be serialized.
    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(method, path).with_json(body)?;
        self.send_for(request).await
    }
}
