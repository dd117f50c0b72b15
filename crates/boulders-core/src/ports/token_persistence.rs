use thiserror::Error;

use crate::auth::TokenRecord;

/// Token tier errors. Never fatal for the caller: the in-memory slot stays
/// authoritative.
#[derive(Debug, Error)]
pub enum TokenTierError {
    #[error("token tier unavailable: {0}")]
    Unavailable(String),

    #[error("token tier data corrupt: {0}")]
    Corrupt(String),

    #[error("token tier i/o failed: {0}")]
    Io(String),
}

/// One persistence tier below the in-memory slot (ephemeral per-session
/// storage, cookie jar).
///
/// Calls are synchronous; a read must not wait on slower tiers.
pub trait TokenPersistencePort: Send + Sync {
    /// Short name used in logs.
    fn tier_name(&self) -> &'static str;

    /// `Ok(None)` when the tier holds nothing usable.
    fn load(&self) -> Result<Option<TokenRecord>, TokenTierError>;

    /// Overwrite the tier with `record`.
    fn save(&self, record: &TokenRecord) -> Result<(), TokenTierError>;

    fn clear(&self) -> Result<(), TokenTierError>;
}
