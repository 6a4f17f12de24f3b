//! Derived values computed from collections: percentages, filtered and grouped views.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::core::journal::JournalEntry;
use crate::core::task::{Priority, Task};
use crate::core::vision::LifeArea;

pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Share of `items` satisfying `is_complete`, as a whole percent rounded half
/// up. Empty input gives 0.
pub fn completion_rate<T>(items: &[T], is_complete: impl Fn(&T) -> bool) -> u8 {
    let total = items.len();
    let done = items.iter().filter(|&item| is_complete(item)).count();
    percent(done, total)
}

pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    // floor(100 * done / total + 1/2) in integers
    ((200 * done + total) / (2 * total)) as u8
}

/// Items satisfying every predicate. No predicates keeps everything.
pub fn filter_by_predicates<'a, T>(items: &'a [T], predicates: &[Predicate<'_, T>]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|&item| predicates.iter().all(|p| p(item)))
        .collect()
}

pub fn unique_tags<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> BTreeSet<String> {
    entries
        .into_iter()
        .flat_map(|entry| entry.tags.iter().cloned())
        .collect()
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn task_matches_search(task: &Task, query: &str) -> bool {
    let query = query.to_lowercase();
    query.is_empty()
        || contains_ignore_case(&task.title, &query)
        || contains_ignore_case(&task.description, &query)
}

/// Case-insensitive substring match on title or description.
pub fn tasks_by_search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| task_matches_search(t, query)).collect()
}

pub fn group_by<'a, T: 'a, K: Ord>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> K,
) -> BTreeMap<K, Vec<&'a T>> {
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

/// Completed milestones over all milestones, across every area.
pub fn overall_milestone_progress(areas: &[LifeArea]) -> u8 {
    let total: usize = areas.iter().map(|a| a.milestones.len()).sum();
    let done: usize = areas.iter().map(LifeArea::completed_milestones).sum();
    percent(done, total)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Task list filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project: Option<String>,
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn predicates(&self) -> Vec<Predicate<'_, Task>> {
        let mut predicates: Vec<Predicate<'_, Task>> = Vec::new();
        if let Some(project) = &self.project {
            predicates.push(Box::new(move |t: &Task| &t.project == project));
        }
        if let Some(priority) = self.priority {
            predicates.push(Box::new(move |t: &Task| t.priority == priority));
        }
        if self.status != StatusFilter::All {
            let status = self.status;
            predicates.push(Box::new(move |t: &Task| status.matches(t)));
        }
        if !self.search.is_empty() {
            let search = self.search.as_str();
            predicates.push(Box::new(move |t: &Task| task_matches_search(t, search)));
        }
        predicates
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        filter_by_predicates(tasks, &self.predicates())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalFilter {
    pub search: String,
    pub date: Option<NaiveDate>,
    /// An entry must carry every selected tag.
    pub tags: Vec<String>,
}

impl JournalFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.date.is_none() && self.tags.is_empty()
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn predicates(&self) -> Vec<Predicate<'_, JournalEntry>> {
        let mut predicates: Vec<Predicate<'_, JournalEntry>> = Vec::new();
        if !self.search.is_empty() {
            let query = self.search.to_lowercase();
            predicates.push(Box::new(move |e: &JournalEntry| {
                contains_ignore_case(&e.title, &query) || contains_ignore_case(&e.content, &query)
            }));
        }
        if let Some(date) = self.date {
            predicates.push(Box::new(move |e: &JournalEntry| e.day() == date));
        }
        if !self.tags.is_empty() {
            let tags = &self.tags;
            predicates.push(Box::new(move |e: &JournalEntry| tags.iter().all(|t| e.has_tag(t))));
        }
        predicates
    }

    pub fn apply<'a>(&self, entries: &'a [JournalEntry]) -> Vec<&'a JournalEntry> {
        filter_by_predicates(entries, &self.predicates())
    }
}
