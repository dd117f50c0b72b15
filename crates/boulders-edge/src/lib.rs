//! Boulders edge layer
//!
//! Composition root for the signup edge: loads configuration, installs the
//! tracing subscriber and serves the CORS proxy over axum.

pub mod bootstrap;
pub mod server;

pub use bootstrap::run::serve;
pub use bootstrap::wiring::SignupClient;
pub use server::build_router;
