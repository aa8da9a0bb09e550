//! Login and refresh calls against the back-office auth endpoints.
//!
//! Requests go straight to the transport, never through the
//! authenticated client, so a failing refresh cannot trigger another one.

use std::sync::Arc;

use async_trait::async_trait;
use backoffice_application::ports::{AuthService, HttpTransport};
use backoffice_domain::{
    ApiRequest, AuthError, ClientSettings, CredentialPair, LoginResponse, RefreshError,
    token_preview,
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

/// `AuthService` over any `HttpTransport`.
pub struct HttpAuthService {
    transport: Arc<dyn HttpTransport>,
    login_path: String,
    refresh_path: String,
}

impl HttpAuthService {
    /// Creates the service using the endpoint paths from `settings`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &ClientSettings) -> Self {
        Self {
            transport,
            login_path: settings.login_path.clone(),
            refresh_path: settings.refresh_path.clone(),
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let request = ApiRequest::post(&self.login_path)
            .with_json(&LoginBody {
                identifier,
                password,
            })
            .map_err(|e| AuthError::InvalidResponse {
                message: e.to_string(),
            })?;

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| AuthError::Network {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            let status = response.status;
            let message = response.error_message();
            debug!(%status, %message, "Login rejected");
            return Err(if matches!(status.as_u16(), 400 | 401 | 403) {
                AuthError::InvalidCredentials { message }
            } else {
                AuthError::Server {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let login: LoginResponse = response.json().map_err(|e| AuthError::InvalidResponse {
            message: format!("Failed to parse login response: {e}"),
        })?;
        info!(user = %login.user.email, role = %login.user.role, "Login accepted");
        Ok(login)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError> {
        debug!(refresh_token = %token_preview(refresh_token), "Calling refresh endpoint");
        let request = ApiRequest::post(&self.refresh_path)
            .with_json(&RefreshBody { refresh_token })
            .map_err(|e| RefreshError::InvalidResponse {
                message: e.to_string(),
            })?;

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| RefreshError::Network {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status.as_u16(),
                message: response.error_message(),
            });
        }

        response.json().map_err(|e| RefreshError::InvalidResponse {
            message: format!("Failed to parse refresh response: {e}"),
        })
    }
}
