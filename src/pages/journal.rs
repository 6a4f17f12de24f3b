use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use super::SyncedState;
use crate::aggregate::{JournalFilter, unique_tags};
use crate::collection::Collection;
use crate::core::journal::{JournalDraft, JournalEntry};
use crate::core::timestamp;
use crate::export::{ExportedDocument, export_entry};
use crate::store::{EntityStore, keys};

#[derive(Debug)]
pub struct JournalPage {
    entries: SyncedState<Collection<JournalEntry>>,
}

impl JournalPage {
    pub fn mount(store: Arc<EntityStore>) -> Self {
        Self {
            entries: SyncedState::mount(store, keys::JOURNAL_ENTRIES, Collection::new),
        }
    }

    pub fn entries(&self) -> &Collection<JournalEntry> {
        self.entries.get()
    }

    /// New entries are stamped with the current time. Editing keeps the
    /// original date.
    pub fn save_entry(&mut self, draft: JournalDraft, editing: Option<Uuid>) -> crate::Result<Uuid> {
        let (next, id) = match editing {
            Some(id) => (
                self.entries
                    .get()
                    .try_update(&id, |entry| draft.apply_to(entry))?,
                id,
            ),
            None => self
                .entries
                .get()
                .try_add(draft.into_entry(timestamp::now()))?,
        };
        self.entries.apply(|_| next)?;
        log::debug!("Saved journal entry {}", id);
        Ok(id)
    }

    pub fn delete(&mut self, id: Uuid) -> crate::Result<()> {
        self.entries.apply(|entries| entries.remove(&id))?;
        Ok(())
    }

    pub fn visible(&self, filter: &JournalFilter) -> Vec<&JournalEntry> {
        filter.apply(self.entries.get().as_slice())
    }

    pub fn all_tags(&self) -> BTreeSet<String> {
        unique_tags(self.entries.get())
    }

    pub fn export(&self, id: Uuid) -> Option<ExportedDocument> {
        self.entries.get().get(&id).map(export_entry)
    }

    pub fn reload(&mut self) {
        self.entries.reload();
    }
}
