//! # boulders-infra
//!
//! Adapters implementing the `boulders-core` ports: the system clock, the
//! token persistence tiers, the reqwest-backed API client and the proxy's
//! upstream transport.

pub mod codec;
pub mod http;
pub mod storage;
pub mod time;
pub mod upstream;

pub use http::{ApiClient, HttpSignupApi};
pub use storage::{CookieTier, FileCookieJar, SessionStorage, SessionStorageTier};
pub use time::SystemClock;
pub use upstream::ReqwestUpstream;
