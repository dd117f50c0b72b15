//! Configuration data structures.
//!
//! Pure data: the bootstrap layer reads the file, this module only describes
//! its shape and the default for each key.

mod defaults;
pub mod model;

pub use defaults::{DEFAULT_LOCALE, DEFAULT_PRODUCTION_ORIGIN};
pub use model::{ClientSettings, CorsSettings, EdgeConfig, ServerSettings, UpstreamSettings};
