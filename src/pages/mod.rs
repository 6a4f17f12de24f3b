//! Page controllers. Each page owns the persisted values it edits and writes
//! the whole value back through the store after every mutation.

pub mod dashboard;
pub mod journal;
pub mod planning;
pub mod tasks;
pub mod videos;
pub mod vision;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::store::EntityStore;

pub use dashboard::DashboardPage;
pub use journal::JournalPage;
pub use planning::PlanningPage;
pub use tasks::TasksPage;
pub use videos::VideosPage;
pub use vision::VisionPage;

type DefaultFn<V> = Box<dyn Fn() -> V + Send + Sync>;

/// A value mirrored to one store key.
pub struct SyncedState<V> {
    store: Arc<EntityStore>,
    key: &'static str,
    value: V,
    default: DefaultFn<V>,
}

impl<V: std::fmt::Debug> std::fmt::Debug for SyncedState<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedState")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<V: Serialize + DeserializeOwned> SyncedState<V> {
    /// Load `key`, or build the value with `default` when absent or unreadable.
    pub fn mount(
        store: Arc<EntityStore>,
        key: &'static str,
        default: impl Fn() -> V + Send + Sync + 'static,
    ) -> Self {
        let value = store.load_or_else(key, &default);
        Self {
            store,
            key,
            value,
            default: Box::new(default),
        }
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Replace the value with `f(current)` and persist it. A failed save keeps
    /// the new value in memory and returns the error.
    pub fn apply(&mut self, f: impl FnOnce(&V) -> V) -> Result<(), StoreError> {
        self.value = f(&self.value);
        self.store.save(self.key, &self.value)
    }

    /// Re-read the stored value, e.g. after another writer changed it.
    pub fn reload(&mut self) {
        self.value = self.store.load_or_else(self.key, &self.default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, keys};

    fn mount(store: &Arc<EntityStore>) -> SyncedState<Vec<String>> {
        SyncedState::mount(Arc::clone(store), keys::PROJECTS, || vec!["Health".to_string()])
    }

    #[test]
    fn mount_uses_default_until_saved() {
        let store = Arc::new(EntityStore::in_memory());
        let mut projects = mount(&store);
        assert_eq!(projects.get(), &["Health"]);

        projects
            .apply(|p| {
                let mut next = p.clone();
                next.push("Career".to_string());
                next
            })
            .unwrap();
        assert_eq!(mount(&store).get(), &["Health", "Career"]);
    }

    #[test]
    fn failed_save_keeps_new_value() {
        let store = Arc::new(EntityStore::new(MemoryBackend::with_quota(4)));
        let mut projects = mount(&store);
        let err = projects.apply(|_| vec!["Personal Growth".to_string()]);
        assert!(matches!(err, Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(projects.get(), &["Personal Growth"]);

        projects.reload();
        assert_eq!(projects.get(), &["Health"]);
    }

    #[test]
    fn reload_picks_up_other_writers() {
        let store = Arc::new(EntityStore::in_memory());
        let mut a = mount(&store);
        let mut b = mount(&store);
        b.apply(|_| vec!["Finance".to_string()]).unwrap();
        assert_eq!(a.get(), &["Health"]);
        a.reload();
        assert_eq!(a.get(), &["Finance"]);
    }
}
