//! Process-wide credential slot with tiered persistence.
//!
//! The in-memory slot is authoritative. Every save writes through to the
//! persistence tiers; every read that misses memory walks the tiers in
//! order, stops at the first hit and rehydrates memory from it.
//!
//! Tier walks, saves and clears are serialized on one lock so a rehydration
//! that started before a logout cannot put the old record back afterwards.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use boulders_core::auth::{AuthState, TokenRecord};
use boulders_core::ports::{AccessTokenPort, ClockPort, TokenPersistencePort};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct TokenStore {
    memory: RwLock<Option<TokenRecord>>,
    tier_lock: Mutex<()>,
    tiers: Vec<Arc<dyn TokenPersistencePort>>,
    clock: Arc<dyn ClockPort>,
    auth_state: watch::Sender<AuthState>,
}

impl TokenStore {
    /// `tiers` are consulted in the given order after the memory slot.
    pub fn new(tiers: Vec<Arc<dyn TokenPersistencePort>>, clock: Arc<dyn ClockPort>) -> Self {
        let (auth_state, _) = watch::channel(AuthState::SignedOut);
        Self {
            memory: RwLock::new(None),
            tier_lock: Mutex::new(()),
            tiers,
            clock,
            auth_state,
        }
    }

    /// Overwrite the slot wholesale and write through to every tier.
    pub fn save_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<i64>,
        metadata: Option<Value>,
    ) {
        self.save_record(TokenRecord {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
            metadata,
        });
    }

    pub fn save_record(&self, record: TokenRecord) {
        let _tiers = self.tier_lock.lock().unwrap_or_else(PoisonError::into_inner);
        for tier in &self.tiers {
            if let Err(e) = tier.save(&record) {
                warn!(tier = tier.tier_name(), error = %e, "failed to persist tokens");
            }
        }
        *self.memory.write().unwrap_or_else(PoisonError::into_inner) = Some(record);
        info!("tokens saved");
        self.publish(AuthState::SignedIn);
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.current().map(|record| record.access_token)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.current().map(|record| record.refresh_token)
    }

    pub fn get_token_metadata(&self) -> Option<Value> {
        self.current().and_then(|record| record.metadata)
    }

    /// Wipe memory and every tier.
    pub fn clear_tokens(&self) {
        let _tiers = self.tier_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.memory.write().unwrap_or_else(PoisonError::into_inner) = None;
        for tier in &self.tiers {
            if let Err(e) = tier.clear() {
                warn!(tier = tier.tier_name(), error = %e, "failed to clear tokens");
            }
        }
        info!("tokens cleared");
        self.publish(AuthState::SignedOut);
    }

    /// `false` when nothing is stored or the record carries no expiry.
    pub fn is_token_expired(&self) -> bool {
        self.current()
            .is_some_and(|record| record.is_expired_at(self.clock.now_ms()))
    }

    /// Auth state changes, fired on every save and clear.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_state.subscribe()
    }

    /// Forget the in-memory slot only. The next read falls back to the tiers.
    pub fn reset(&self) {
        *self.memory.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current(&self) -> Option<TokenRecord> {
        if let Some(record) = self.in_memory() {
            return Some(record);
        }

        let _tiers = self.tier_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // A save or another rehydration may have landed while we waited.
        if let Some(record) = self.in_memory() {
            return Some(record);
        }

        for tier in &self.tiers {
            match tier.load() {
                Ok(Some(record)) => {
                    debug!(tier = tier.tier_name(), "rehydrating tokens from tier");
                    *self.memory.write().unwrap_or_else(PoisonError::into_inner) =
                        Some(record.clone());
                    self.publish(AuthState::SignedIn);
                    return Some(record);
                }
                Ok(None) => {}
                Err(e) => warn!(tier = tier.tier_name(), error = %e, "failed to read tokens"),
            }
        }
        None
    }

    fn in_memory(&self) -> Option<TokenRecord> {
        self.memory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, state: AuthState) {
        self.auth_state.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }
}

impl AccessTokenPort for TokenStore {
    fn access_token(&self) -> Option<String> {
        self.get_access_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boulders_core::auth::EXPIRY_SAFETY_MARGIN_MS;
    use boulders_core::ports::TokenTierError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    struct FixedClock(AtomicI64);

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct MemoryTier {
        slot: Mutex<Option<TokenRecord>>,
        loads: AtomicI64,
    }

    impl MemoryTier {
        fn wipe(&self) {
            *self.slot.lock().unwrap() = None;
        }
    }

    impl TokenPersistencePort for MemoryTier {
        fn tier_name(&self) -> &'static str {
            "test"
        }

        fn load(&self) -> Result<Option<TokenRecord>, TokenTierError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.slot.lock().unwrap().clone())
        }

        fn save(&self, record: &TokenRecord) -> Result<(), TokenTierError> {
            *self.slot.lock().unwrap() = Some(record.clone());
            Ok(())
        }

        fn clear(&self) -> Result<(), TokenTierError> {
            self.wipe();
            Ok(())
        }
    }

    struct BrokenTier;

    impl TokenPersistencePort for BrokenTier {
        fn tier_name(&self) -> &'static str {
            "broken"
        }

        fn load(&self) -> Result<Option<TokenRecord>, TokenTierError> {
            Err(TokenTierError::Unavailable("disabled".into()))
        }

        fn save(&self, _record: &TokenRecord) -> Result<(), TokenTierError> {
            Err(TokenTierError::Unavailable("disabled".into()))
        }

        fn clear(&self) -> Result<(), TokenTierError> {
            Err(TokenTierError::Unavailable("disabled".into()))
        }
    }

    /// Pauses the first `load` after reading its record until released.
    struct PausingTier {
        inner: MemoryTier,
        paused: AtomicBool,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl TokenPersistencePort for PausingTier {
        fn tier_name(&self) -> &'static str {
            "pausing"
        }

        fn load(&self) -> Result<Option<TokenRecord>, TokenTierError> {
            let record = self.inner.load()?;
            if !self.paused.swap(true, Ordering::SeqCst) {
                self.entered.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            Ok(record)
        }

        fn save(&self, record: &TokenRecord) -> Result<(), TokenTierError> {
            self.inner.save(record)
        }

        fn clear(&self) -> Result<(), TokenTierError> {
            self.inner.clear()
        }
    }

    fn store(tiers: Vec<Arc<dyn TokenPersistencePort>>, now_ms: i64) -> TokenStore {
        TokenStore::new(tiers, Arc::new(FixedClock(AtomicI64::new(now_ms))))
    }

    #[test]
    fn round_trip_survives_losing_memory_then_the_session_tier() {
        let session = Arc::new(MemoryTier::default());
        let cookie = Arc::new(MemoryTier::default());
        let store = store(vec![session.clone(), cookie.clone()], 0);

        store.save_tokens("access", "refresh", None, Some(json!({"customerId": 7})));

        store.reset();
        assert_eq!(store.get_access_token().as_deref(), Some("access"));
        assert_eq!(cookie.loads.load(Ordering::SeqCst), 0, "tier 3 untouched");

        store.reset();
        session.wipe();
        assert_eq!(store.get_refresh_token().as_deref(), Some("refresh"));
        assert_eq!(store.get_token_metadata(), Some(json!({"customerId": 7})));
    }

    #[test]
    fn memory_hit_short_circuits_the_tiers() {
        let session = Arc::new(MemoryTier::default());
        let store = store(vec![session.clone()], 0);
        store.save_tokens("access", "refresh", None, None);

        store.get_access_token();
        store.get_refresh_token();

        assert_eq!(session.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_tiers_are_swallowed() {
        let cookie = Arc::new(MemoryTier::default());
        let store = store(vec![Arc::new(BrokenTier), cookie.clone()], 0);

        store.save_tokens("access", "refresh", None, None);
        store.reset();

        assert_eq!(store.get_access_token().as_deref(), Some("access"));
        store.clear_tokens();
        assert_eq!(store.get_access_token(), None);
    }

    #[test]
    fn clear_wipes_every_tier() {
        let session = Arc::new(MemoryTier::default());
        let cookie = Arc::new(MemoryTier::default());
        let store = store(vec![session.clone(), cookie.clone()], 0);
        store.save_tokens("access", "refresh", None, None);

        store.clear_tokens();
        store.reset();

        assert_eq!(store.get_access_token(), None);
        assert_eq!(session.load().unwrap(), None);
        assert_eq!(cookie.load().unwrap(), None);
    }

    #[test]
    fn logout_during_rehydration_leaves_memory_empty() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let tier = Arc::new(PausingTier {
            inner: MemoryTier::default(),
            paused: AtomicBool::new(true),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let store = Arc::new(store(vec![tier.clone()], 0));
        store.save_tokens("stale", "refresh", None, None);
        store.reset();
        tier.paused.store(false, Ordering::SeqCst);

        let reader = {
            let store = store.clone();
            thread::spawn(move || store.get_access_token())
        };
        entered_rx.recv().unwrap();

        let logout = {
            let store = store.clone();
            thread::spawn(move || store.clear_tokens())
        };
        thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();

        reader.join().unwrap();
        logout.join().unwrap();

        assert_eq!(store.in_memory(), None);
        assert_eq!(*store.subscribe().borrow(), AuthState::SignedOut);
        assert_eq!(store.get_access_token(), None);
    }

    #[test]
    fn expiry_uses_the_five_minute_margin() {
        let expires_at = 10_000_000;
        let cases = [
            (expires_at - EXPIRY_SAFETY_MARGIN_MS - 1, false),
            (expires_at - EXPIRY_SAFETY_MARGIN_MS, true),
            (expires_at + 1, true),
        ];
        for (now, expected) in cases {
            let store = store(vec![], now);
            store.save_tokens("a", "r", Some(expires_at), None);
            assert_eq!(store.is_token_expired(), expected, "now = {now}");
        }
    }

    #[test]
    fn missing_expiry_never_expires() {
        let store = store(vec![], i64::MAX);
        assert!(!store.is_token_expired());
        store.save_tokens("a", "r", None, None);
        assert!(!store.is_token_expired());
    }

    #[test]
    fn subscribers_see_sign_in_and_sign_out() {
        let store = store(vec![], 0);
        let mut rx = store.subscribe();
        assert_eq!(*rx.borrow(), AuthState::SignedOut);

        store.save_tokens("a", "r", None, None);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedIn);

        store.save_tokens("b", "r", None, None);
        assert!(!rx.has_changed().unwrap(), "already signed in");

        store.clear_tokens();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);
    }

    #[test]
    fn serves_as_the_access_token_capability() {
        let store = store(vec![], 0);
        store.save_tokens("bearer-me", "r", None, None);
        let port: &dyn AccessTokenPort = &store;
        assert_eq!(port.access_token().as_deref(), Some("bearer-me"));
    }
}
