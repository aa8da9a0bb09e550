//! Remote authentication service adapter.

mod http_auth_service;

pub use http_auth_service::HttpAuthService;
