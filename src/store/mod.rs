//! Entity store: named values serialized as JSON text over a [`StorageBackend`].
//!
//! Loads fail soft (absent or malformed values become the caller's default),
//! saves overwrite the whole value under a key and report failures.

pub mod backend;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CompassConfig;
use crate::error::StoreError;
pub use backend::{FileBackend, MemoryBackend, StorageBackend};

/// Storage keys shared by every page.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const PROJECTS: &str = "projects";
    pub const JOURNAL_ENTRIES: &str = "journalEntries";
    pub const YEARLY_PLANNERS: &str = "yearlyPlanners";
    pub const MONTHLY_PLANS: &str = "monthlyPlans";
    pub const LIFE_AREAS: &str = "lifeAreas";
    pub const VIDEO_PLAYLISTS: &str = "videoPlaylists";
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const MOOD_ENTRIES: &str = "moodEntries";

    pub const ALL: [&str; 9] = [
        TASKS,
        PROJECTS,
        JOURNAL_ENTRIES,
        YEARLY_PLANNERS,
        MONTHLY_PLANS,
        LIFE_AREAS,
        VIDEO_PLAYLISTS,
        IS_AUTHENTICATED,
        MOOD_ENTRIES,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

pub struct EntityStore {
    backend: Box<dyn StorageBackend>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore").finish_non_exhaustive()
    }
}

impl EntityStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// File-backed store in the configured data directory.
    pub fn from_config(config: &CompassConfig) -> Self {
        let quota = (config.storage_quota_bytes > 0).then_some(config.storage_quota_bytes);
        Self::new(FileBackend::new(&config.data_directory).with_quota(quota))
    }

    /// Read and parse a value. `Ok(None)` when the key is absent.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(text) = self.backend.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Deserialize {
                key: key.to_string(),
                source,
            })
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or_else(key, T::default)
    }

    /// Load a value, falling back to `default` when absent or unreadable.
    pub fn load_or_else<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                log::debug!("No stored value for {}, using default", key);
                default()
            }
            Err(e) => {
                log::warn!("Ignoring stored {}: {}", key, e);
                default()
            }
        }
    }

    /// Serialize and overwrite the whole value under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, &text).inspect_err(|e| {
            log::error!("Failed to save {}: {}", key, e);
        })?;
        self.notify(key);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)?;
        self.notify(key);
        Ok(())
    }

    /// Call `listener` with the key after every successful save or remove.
    pub fn subscribe(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn notify(&self, key: &str) {
        // Snapshot so listeners may save or subscribe themselves.
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(key);
        }
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn load_absent_returns_default() {
        let store = EntityStore::in_memory();
        let value: Vec<String> = store.load(keys::PROJECTS);
        assert!(value.is_empty());
        let seeded = store.load_or_else(keys::PROJECTS, || vec!["Health".to_string()]);
        assert_eq!(seeded, vec!["Health"]);
    }

    #[test]
    fn load_malformed_fails_soft() {
        let backend = MemoryBackend::new();
        backend.insert_raw(keys::PROJECTS, "{not json");
        let store = EntityStore::new(backend);

        let value: Vec<String> = store.load(keys::PROJECTS);
        assert!(value.is_empty());
        assert!(matches!(
            store.try_load::<Vec<String>>(keys::PROJECTS),
            Err(StoreError::Deserialize { .. })
        ));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let store = EntityStore::in_memory();
        let projects = vec!["Health".to_string(), "Career".to_string()];
        store.save(keys::PROJECTS, &projects).unwrap();
        let loaded: Vec<String> = store.load(keys::PROJECTS);
        assert_eq!(loaded, projects);
    }

    #[test]
    fn quota_failure_propagates() {
        let store = EntityStore::new(MemoryBackend::with_quota(8));
        let err = store
            .save(keys::PROJECTS, &vec!["a long project name"])
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    }

    #[test]
    fn subscribers_see_saved_keys_until_unsubscribed() {
        let store = EntityStore::in_memory();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let id = store.subscribe(move |key| {
            assert_eq!(key, keys::TASKS);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.save(keys::TASKS, &Vec::<u8>::new()).unwrap();
        store.remove(keys::TASKS).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.save(keys::TASKS, &Vec::<u8>::new()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_save_does_not_notify() {
        let store = EntityStore::new(MemoryBackend::with_quota(1));
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert!(store.save(keys::TASKS, &vec![1, 2, 3]).is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
