//! # boulders-core
//!
//! Core domain models and business logic for the Boulders membership signup.
//!
//! This crate contains pure business logic without any infrastructure
//! dependencies: the signup wizard, validation schemas, token records, the
//! edge proxy policy and the port traits adapters implement.

pub mod api;
pub mod auth;
pub mod config;
pub mod ports;
pub mod proxy;
pub mod signup;

pub use api::{ApiBase, HttpError};
pub use auth::{AuthState, TokenRecord};
pub use config::EdgeConfig;
pub use signup::{SignupDraft, SignupWizard, Step, StepStatus};
