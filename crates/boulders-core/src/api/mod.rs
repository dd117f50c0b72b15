//! Client-side API boundary types: where requests go and how they fail.

pub mod base;
pub mod error;

pub use base::ApiBase;
pub use error::HttpError;
