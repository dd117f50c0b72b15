//! Edge proxy policy.
//!
//! Decides, without doing any I/O, which origin to echo back, whether an
//! upstream path may be forwarded and which physical host serves it.

pub mod allow_list;
pub mod cors;
pub mod rewrite;

pub use allow_list::PathAllowList;
pub use cors::{cors_headers, resolve_allowed_origin, security_headers};
pub use rewrite::{route_for, upstream_url, UpstreamRoute};
