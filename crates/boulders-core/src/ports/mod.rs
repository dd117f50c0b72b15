//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the adapters that
//! talk to storage, the network and the system clock. The core never
//! depends on an adapter; adapters depend on these traits.

mod access_token;
mod clock;
pub mod signup_api;
pub mod token_persistence;
pub mod upstream;

pub use access_token::AccessTokenPort;
pub use clock::ClockPort;
pub use signup_api::{PaymentRedirect, SignupApiError, SignupApiPort};
pub use token_persistence::{TokenPersistencePort, TokenTierError};
pub use upstream::{UpstreamError, UpstreamPort, UpstreamRequest, UpstreamResponse};
