//! HTTP adapters for the signup API.

pub mod api_client;
pub mod signup_api;

pub use api_client::{ApiClient, DEFAULT_REQUEST_TIMEOUT};
pub use signup_api::HttpSignupApi;
