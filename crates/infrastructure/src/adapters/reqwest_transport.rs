//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It resolves request
//! paths against the configured base URL and returns every HTTP response,
//! whatever its status, leaving auth handling to the application layer.

use std::time::Instant;

use async_trait::async_trait;
use backoffice_application::ports::{HttpTransport, TransportError};
use backoffice_domain::{
    ApiRequest, ApiResponse, ClientSettings, Header, Headers, HttpMethod,
    request::CONTENT_TYPE,
};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport from the client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// created.
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let base_url = settings
            .parsed_base_url()
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Appends the request path and query to the base URL, keeping the
    /// base path (`/api` + `/orders` gives `/api/orders`).
    fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let path_and_query = request
            .path_and_query()
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let base = self.base_url.as_str().trim_end_matches('/');
        let separator = if path_and_query.starts_with('/') { "" } else { "/" };
        let url = format!("{base}{separator}{path_and_query}");
        Url::parse(&url).map_err(|e| TransportError::InvalidUrl(format!("{e}: {url}")))
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: Option<u64>) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: timeout_ms.unwrap_or_default(),
            };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let mut message = error.to_string();
            let mut source = std::error::Error::source(error);
            while let Some(cause) = source {
                message.push_str(": ");
                message.push_str(&cause.to_string());
                source = cause.source();
            }
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::Dns {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::Other(format!("more than {MAX_REDIRECTS} redirects"));
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(request)?;
        let timeout_ms = request
            .timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if !request.body.is_empty() {
            if let Some(content_type) = request.body.content_type()
                && !request.headers.contains(CONTENT_TYPE)
            {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            let bytes = request
                .body
                .to_bytes()
                .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();
        let duration = start.elapsed();

        debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = duration.as_millis(),
            "Response received"
        );
        Ok(ApiResponse::new(status, headers, body).with_duration(duration))
    }
}
