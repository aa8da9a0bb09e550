//! Outbound request types

mod api_request;
mod body;
mod header;
mod method;

pub use api_request::ApiRequest;
pub use body::{JSON_CONTENT_TYPE, RequestBody};
pub use header::{AUTHORIZATION, CONTENT_TYPE, Header, Headers};
pub use method::HttpMethod;
