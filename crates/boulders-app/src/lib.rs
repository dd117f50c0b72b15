//! Boulders signup application layer
//!
//! Use cases that drive the wizard, own the credential slot and run the edge
//! proxy algorithm. Everything here talks to the outside world through the
//! ports defined in `boulders-core`.

pub mod auth;
pub mod messages;
pub mod proxy;
pub mod signup;

#[cfg(test)]
mod test_support;

pub use auth::{Login, Logout, TokenStore};
pub use messages::{describe_failure, FailureContext, UserMessage};
pub use proxy::{ProxyError, ProxyRequest, ProxyRequestHandler, ProxyResponse};
pub use signup::{SignupFlow, SignupFlowError};
