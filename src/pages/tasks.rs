use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::SyncedState;
use crate::aggregate::{TaskFilter, group_by};
use crate::collection::Collection;
use crate::config::CompassConfig;
use crate::core::task::{Task, TaskDraft};
use crate::store::{EntityStore, keys};

#[derive(Debug)]
pub struct TasksPage {
    tasks: SyncedState<Collection<Task>>,
    projects: SyncedState<Vec<String>>,
}

impl TasksPage {
    pub fn mount(store: Arc<EntityStore>, config: &CompassConfig) -> Self {
        let default_projects = config.default_projects.clone();
        Self {
            tasks: SyncedState::mount(Arc::clone(&store), keys::TASKS, Collection::new),
            projects: SyncedState::mount(store, keys::PROJECTS, move || default_projects.clone()),
        }
    }

    pub fn tasks(&self) -> &Collection<Task> {
        self.tasks.get()
    }

    pub fn projects(&self) -> &[String] {
        self.projects.get()
    }

    /// Create a task from the form, or merge it into the task being edited.
    /// Returns the id of the saved task. Both the task list and the project
    /// list are updated in memory before the first save error is returned.
    pub fn save_task(&mut self, draft: TaskDraft, editing: Option<Uuid>) -> crate::Result<Uuid> {
        let project = draft.project.clone();
        let (next, id) = match editing {
            Some(id) => (self.tasks.get().try_update(&id, |task| draft.apply_to(task))?, id),
            None => self.tasks.get().try_add(draft.into_task())?,
        };

        let saved = self.tasks.apply(|_| next);
        log::debug!("Saved task {}", id);
        let registered = self.add_project(&project);
        saved?;
        registered?;
        Ok(id)
    }

    pub fn toggle_complete(&mut self, id: Uuid) -> crate::Result<()> {
        self.tasks.apply(|tasks| tasks.toggle(&id, |t| &mut t.completed))?;
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> crate::Result<()> {
        self.tasks.apply(|tasks| tasks.remove(&id))?;
        Ok(())
    }

    /// Complete the current occurrence. Recurring tasks move to their next due
    /// date and stay active; others are marked completed.
    pub fn complete_occurrence(&mut self, id: Uuid, today: NaiveDate) -> crate::Result<()> {
        self.tasks.apply(|tasks| {
            tasks.update(&id, |task| {
                if !task.advance_recurrence(today) {
                    task.completed = true;
                }
            })
        })?;
        Ok(())
    }

    pub fn visible(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(self.tasks.get().as_slice())
    }

    /// Tasks grouped by project label. Tasks without a project sit under "".
    pub fn by_project(&self) -> BTreeMap<String, Vec<&Task>> {
        group_by(self.tasks.get(), |t| t.project.clone())
    }

    /// Register a project name. Blank or known names are ignored.
    pub fn add_project(&mut self, name: &str) -> crate::Result<()> {
        let name = name.trim();
        if name.is_empty() || self.projects.get().iter().any(|p| p == name) {
            return Ok(());
        }
        self.projects.apply(|projects| {
            let mut next = projects.clone();
            next.push(name.to_string());
            next
        })?;
        log::info!("Added project {}", name);
        Ok(())
    }

    pub fn reload(&mut self) {
        self.tasks.reload();
        self.projects.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::StatusFilter;
    use crate::core::recurrence::RecurringPattern;
    use crate::core::task::Priority;
    use crate::error::{Error, StoreError, ValidationError};
    use crate::store::{MemoryBackend, StorageBackend};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn page() -> (Arc<EntityStore>, TasksPage) {
        let store = Arc::new(EntityStore::in_memory());
        let page = TasksPage::mount(Arc::clone(&store), &CompassConfig::default());
        (store, page)
    }

    #[test]
    fn create_prepends_and_persists() {
        let (store, mut page) = page();
        let mut draft = TaskDraft::new("Draft report");
        draft.priority = Priority::High;
        draft.project = "Career".to_string();
        let first = page.save_task(draft, None).unwrap();
        let second = page.save_task(TaskDraft::new("Walk"), None).unwrap();

        assert_eq!(page.tasks().ids(), vec![second, first]);
        let task = page.tasks().get(&first).unwrap();
        assert_eq!(task.title, "Draft report");
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);

        let reopened = TasksPage::mount(store, &CompassConfig::default());
        assert_eq!(reopened.tasks(), page.tasks());
    }

    /// Fails every write to one key.
    struct RejectKey {
        inner: MemoryBackend,
        key: &'static str,
    }

    impl StorageBackend for RejectKey {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, text: &str) -> Result<(), StoreError> {
            if key == self.key {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size: text.len(),
                    quota: 0,
                });
            }
            self.inner.write(key, text)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_project_save_keeps_new_task() {
        let backend = RejectKey {
            inner: MemoryBackend::new(),
            key: keys::PROJECTS,
        };
        let store = Arc::new(EntityStore::new(backend));
        let mut page = TasksPage::mount(Arc::clone(&store), &CompassConfig::default());

        let mut draft = TaskDraft::new("Plant tomatoes");
        draft.project = "Garden".to_string();
        let err = page.save_task(draft, None).unwrap_err();
        assert!(err.is_persistence());

        assert_eq!(page.tasks().len(), 1);
        assert_eq!(page.tasks().as_slice()[0].title, "Plant tomatoes");
        assert!(page.projects().iter().any(|p| p == "Garden"));
        // The task list itself was written.
        let stored: Vec<Task> = store.load(keys::TASKS);
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn failed_task_save_still_registers_project() {
        let backend = RejectKey {
            inner: MemoryBackend::new(),
            key: keys::TASKS,
        };
        let store = Arc::new(EntityStore::new(backend));
        let mut page = TasksPage::mount(Arc::clone(&store), &CompassConfig::default());

        let mut draft = TaskDraft::new("Plant tomatoes");
        draft.project = "Garden".to_string();
        assert!(page.save_task(draft, None).unwrap_err().is_persistence());
        assert_eq!(page.tasks().len(), 1);
        let stored: Vec<String> = store.load(keys::PROJECTS);
        assert!(stored.iter().any(|p| p == "Garden"));
    }

    #[test]
    fn high_priority_career_task_toggled_complete() {
        let (_store, mut page) = page();
        let mut draft = TaskDraft::new("Draft report");
        draft.priority = Priority::High;
        draft.project = "Career".to_string();
        let id = page.save_task(draft, None).unwrap();
        page.toggle_complete(id).unwrap();

        let done_high: Vec<&Task> = page
            .tasks()
            .iter()
            .filter(|t| t.completed && t.priority == Priority::High)
            .collect();
        assert_eq!(done_high.len(), 1);
        assert_eq!(done_high[0].title, "Draft report");
        assert_eq!(done_high[0].project, "Career");
    }

    #[test]
    fn edit_to_blank_title_is_rejected() {
        let (_store, mut page) = page();
        let id = page.save_task(TaskDraft::new("Walk"), None).unwrap();
        let err = page.save_task(TaskDraft::new(""), Some(id)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Required { field: "title" })
        ));
        assert_eq!(page.tasks().get(&id).unwrap().title, "Walk");
    }

    #[test]
    fn blank_title_is_rejected_without_writing() {
        let (store, mut page) = page();
        let err = page.save_task(TaskDraft::new("   "), None).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Required { field: "title" })
        ));
        assert!(page.tasks().is_empty());
        assert!(store.try_load::<Vec<Task>>(keys::TASKS).unwrap().is_none());
    }

    #[test]
    fn edit_keeps_id_and_completion() {
        let (_store, mut page) = page();
        let id = page.save_task(TaskDraft::new("Draft report"), None).unwrap();
        page.toggle_complete(id).unwrap();

        let mut draft = TaskDraft::from(page.tasks().get(&id).unwrap());
        draft.title = "Final report".to_string();
        assert_eq!(page.save_task(draft, Some(id)).unwrap(), id);

        let task = page.tasks().get(&id).unwrap();
        assert_eq!(task.title, "Final report");
        assert!(task.completed);
        assert_eq!(page.tasks().len(), 1);
    }

    #[test]
    fn unknown_project_is_registered_once() {
        let (_store, mut page) = page();
        let mut draft = TaskDraft::new("Plant tomatoes");
        draft.project = "Garden".to_string();
        page.save_task(draft.clone(), None).unwrap();
        page.save_task(draft, None).unwrap();

        let gardens = page.projects().iter().filter(|p| *p == "Garden").count();
        assert_eq!(gardens, 1);
        assert!(page.projects().iter().any(|p| p == "Health"));
    }

    #[test]
    fn toggle_and_delete_absent_ids_are_noops() {
        let (_store, mut page) = page();
        let id = page.save_task(TaskDraft::new("Walk"), None).unwrap();
        page.toggle_complete(Uuid::new_v4()).unwrap();
        page.delete(Uuid::new_v4()).unwrap();
        assert_eq!(page.tasks().len(), 1);
        assert!(!page.tasks().get(&id).unwrap().completed);

        page.delete(id).unwrap();
        assert!(page.tasks().is_empty());
    }

    #[test]
    fn recurring_occurrence_moves_due_date() {
        let (_store, mut page) = page();
        let mut draft = TaskDraft::new("Water plants");
        draft.recurring = true;
        draft.recurring_pattern = Some(RecurringPattern::Weekly);
        draft.due_date = Some(date(2026, 3, 2));
        let recurring = page.save_task(draft, None).unwrap();
        let once = page.save_task(TaskDraft::new("File taxes"), None).unwrap();

        page.complete_occurrence(recurring, date(2026, 3, 2)).unwrap();
        page.complete_occurrence(once, date(2026, 3, 2)).unwrap();

        let task = page.tasks().get(&recurring).unwrap();
        assert_eq!(task.due_date, Some(date(2026, 3, 9)));
        assert!(!task.completed);
        assert!(page.tasks().get(&once).unwrap().completed);
    }

    #[test]
    fn visible_applies_every_filter() {
        let (_store, mut page) = page();
        for (title, project) in [("Morning walk", "Health"), ("Walk the dog", "Personal Growth")] {
            let mut draft = TaskDraft::new(title);
            draft.project = project.to_string();
            page.save_task(draft, None).unwrap();
        }
        let mut draft = TaskDraft::new("Evening walk");
        draft.project = "Health".to_string();
        let done = page.save_task(draft, None).unwrap();
        page.toggle_complete(done).unwrap();

        let filter = TaskFilter {
            project: Some("Health".to_string()),
            status: StatusFilter::Active,
            search: "WALK".to_string(),
            ..TaskFilter::default()
        };
        let titles: Vec<_> = page.visible(&filter).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Morning walk"]);
        assert_eq!(page.visible(&TaskFilter::default()).len(), 3);
    }

    #[test]
    fn grouped_by_project() {
        let (_store, mut page) = page();
        for (title, project) in [("a", "Health"), ("b", "Career"), ("c", "Health"), ("d", "")] {
            let mut draft = TaskDraft::new(title);
            draft.project = project.to_string();
            page.save_task(draft, None).unwrap();
        }
        let groups = page.by_project();
        assert_eq!(groups["Health"].len(), 2);
        assert_eq!(groups["Career"].len(), 1);
        assert_eq!(groups[""].len(), 1);
    }
}
