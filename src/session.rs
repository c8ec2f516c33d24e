use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::StoreError;

/// Session storage key shared with the web application.
pub const RELOAD_FLAG_KEY: &str = "retry-lazy-refreshed";

/// Session-scoped string key/value storage.
///
/// Values live as long as the hosting session does; nothing in this crate
/// ever removes a key.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Writes `value` under `key` unless `is_set` already holds for the
    /// stored value. Returns whether this call performed the write.
    ///
    /// The default reads then writes without a lock, which only holds up on
    /// a single-threaded host. Stores shared between threads override it.
    fn claim(
        &self,
        key: &str,
        value: &str,
        is_set: &dyn Fn(Option<&str>) -> Result<bool, StoreError>,
    ) -> Result<bool, StoreError> {
        let current = self.get_item(key)?;
        if is_set(current.as_deref())? {
            return Ok(false);
        }
        self.set_item(key, value)?;
        Ok(true)
    }
}

/// In-process session store for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every key, as a fresh browser session would.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn claim(
        &self,
        key: &str,
        value: &str,
        is_set: &dyn Fn(Option<&str>) -> Result<bool, StoreError>,
    ) -> Result<bool, StoreError> {
        let mut items = self.lock();
        if is_set(items.get(key).map(String::as_str))? {
            return Ok(false);
        }
        items.insert(key.to_owned(), value.to_owned());
        Ok(true)
    }
}

/// Once-per-session reload marker stored under [`RELOAD_FLAG_KEY`].
#[derive(Clone)]
pub struct ReloadFlag {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ReloadFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadFlag")
            .field("key", &RELOAD_FLAG_KEY)
            .finish()
    }
}

impl ReloadFlag {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Whether a reload has already been triggered this session.
    pub fn is_set(&self) -> Result<bool, StoreError> {
        let value = self.store.get_item(RELOAD_FLAG_KEY)?;
        decode_flag(value.as_deref())
    }

    /// Sets the flag if it is unset. Returns `true` when this call set it,
    /// meaning the caller owns the session's one reload.
    pub fn try_claim(&self) -> Result<bool, StoreError> {
        self.store.claim(RELOAD_FLAG_KEY, "true", &decode_flag)
    }
}

/// Decodes the stored flag the way the web application writes it: a JSON
/// boolean, with a missing key or an empty value meaning `false`.
fn decode_flag(value: Option<&str>) -> Result<bool, StoreError> {
    let Some(raw) = value.filter(|raw| !raw.is_empty()) else {
        return Ok(false);
    };
    serde_json::from_str::<bool>(raw).map_err(|_| StoreError::Corrupt {
        key: RELOAD_FLAG_KEY.to_owned(),
        value: raw.to_owned(),
    })
}
