//! Token persistence tiers below the in-memory slot.

pub mod cookie_jar;
pub mod cookie_tier;
pub mod session_storage;

pub use cookie_jar::{Cookie, FileCookieJar, SameSite, DEFAULT_COOKIE_JAR_FILE};
pub use cookie_tier::{CookieTier, LOGIN_SESSION_COOKIE};
pub use session_storage::{SessionStorage, SessionStorageTier, AUTH_TOKENS_KEY};
