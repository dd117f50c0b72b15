//! Ephemeral per-session key/value storage and the token tier built on it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use boulders_core::auth::TokenRecord;
use boulders_core::ports::{TokenPersistencePort, TokenTierError};

pub const AUTH_TOKENS_KEY: &str = "boulders_auth_tokens";

/// String storage that lives as long as one client session. Cloning shares
/// the underlying map.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, TokenTierError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| TokenTierError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    pub fn set_item(&self, key: &str, value: String) -> Result<(), TokenTierError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TokenTierError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), TokenTierError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TokenTierError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    /// Drop everything, as when the session ends.
    pub fn end_session(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

/// Tier 2: the token record as JSON under [`AUTH_TOKENS_KEY`].
pub struct SessionStorageTier {
    storage: SessionStorage,
    key: String,
}

impl SessionStorageTier {
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_key(storage, AUTH_TOKENS_KEY)
    }

    pub fn with_key(storage: SessionStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl TokenPersistencePort for SessionStorageTier {
    fn tier_name(&self) -> &'static str {
        "session_storage"
    }

    fn load(&self) -> Result<Option<TokenRecord>, TokenTierError> {
        let Some(json) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| TokenTierError::Corrupt(e.to_string()))
    }

    fn save(&self, record: &TokenRecord) -> Result<(), TokenTierError> {
        let json =
            serde_json::to_string(record).map_err(|e| TokenTierError::Corrupt(e.to_string()))?;
        self.storage.set_item(&self.key, json)
    }

    fn clear(&self) -> Result<(), TokenTierError> {
        self.storage.remove_item(&self.key)
    }
}
