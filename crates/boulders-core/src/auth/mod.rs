//! Authentication domain module.

pub mod token;

pub use token::{AuthState, TokenGrant, TokenRecord, EXPIRY_SAFETY_MARGIN_MS};
