use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};

use super::SyncedState;
use crate::aggregate::percent;
use crate::collection::Collection;
use crate::core::journal::JournalEntry;
use crate::core::mood::{MoodEntry, mood_label};
use crate::core::task::Task;
use crate::store::{EntityStore, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: [Quote; 8] = [
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "It's not the years in your life that count. It's the life in your years.",
        author: "Abraham Lincoln",
    },
    Quote {
        text: "The purpose of our lives is to be happy.",
        author: "Dalai Lama",
    },
    Quote {
        text: "Life is what happens when you're busy making other plans.",
        author: "John Lennon",
    },
    Quote {
        text: "Get busy living or get busy dying.",
        author: "Stephen King",
    },
    Quote {
        text: "You only live once, but if you do it right, once is enough.",
        author: "Mae West",
    },
    Quote {
        text: "Many of life's failures are people who did not realize how close they were to success when they gave up.",
        author: "Thomas A. Edison",
    },
    Quote {
        text: "If you want to live a happy life, tie it to a goal, not to people or things.",
        author: "Albert Einstein",
    },
];

/// The quote for `today`. Stable for the whole day.
pub fn daily_quote(today: NaiveDate) -> Quote {
    QUOTES[today.ordinal0() as usize % QUOTES.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary<'a> {
    /// Incomplete tasks due today or earlier, overdue first.
    pub today_tasks: Vec<&'a Task>,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub completion_rate: u8,
    /// Entries written in the seven days ending today.
    pub journal_entries: usize,
    pub top_mood: Option<&'static str>,
}

#[derive(Debug)]
pub struct DashboardPage {
    tasks: SyncedState<Collection<Task>>,
    journal: SyncedState<Collection<JournalEntry>>,
    moods: SyncedState<Collection<MoodEntry>>,
}

fn week_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN)
}

impl DashboardPage {
    pub fn mount(store: Arc<EntityStore>) -> Self {
        Self {
            tasks: SyncedState::mount(Arc::clone(&store), keys::TASKS, Collection::new),
            journal: SyncedState::mount(Arc::clone(&store), keys::JOURNAL_ENTRIES, Collection::new),
            moods: SyncedState::mount(store, keys::MOOD_ENTRIES, Collection::new),
        }
    }

    pub fn summary(&self, today: NaiveDate) -> DashboardSummary<'_> {
        let tasks = self.tasks.get();

        let mut today_tasks: Vec<&Task> = tasks.iter().filter(|t| t.is_due_by(today)).collect();
        today_tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| b.priority.cmp(&a.priority))
        });

        let tasks_total = tasks.len();
        let tasks_completed = tasks.iter().filter(|t| t.completed).count();
        let from = week_start(today);
        let journal_entries = self
            .journal
            .get()
            .iter()
            .filter(|e| (from..=today).contains(&e.day()))
            .count();

        DashboardSummary {
            today_tasks,
            tasks_completed,
            tasks_total,
            completion_rate: percent(tasks_completed, tasks_total),
            journal_entries,
            top_mood: self.top_mood(from, today),
        }
    }

    /// Most frequent mood in the window. Ties go to the better mood.
    fn top_mood(&self, from: NaiveDate, to: NaiveDate) -> Option<&'static str> {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for entry in self.moods.get().iter().filter(|m| (from..=to).contains(&m.date)) {
            *counts.entry(entry.level).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by_key(|&(level, count)| (count, level))
            .and_then(|(level, _)| mood_label(level))
    }

    pub fn mood_for(&self, day: NaiveDate) -> Option<&MoodEntry> {
        self.moods.get().iter().find(|m| m.date == day)
    }

    /// Record today's mood. Logging again the same day replaces the level.
    pub fn log_mood(&mut self, today: NaiveDate, level: u8) -> crate::Result<()> {
        let moods = self.moods.get();
        let next = match self.mood_for(today).map(|m| m.id) {
            Some(id) => moods.try_update(&id, |m| m.level = level)?,
            None => moods.try_add(MoodEntry::new(today, level))?.0,
        };
        self.moods.apply(|_| next)?;
        log::debug!("Logged mood {} for {}", level, today);
        Ok(())
    }

    pub fn daily_quote(&self, today: NaiveDate) -> Quote {
        daily_quote(today)
    }

    /// Pick up changes saved by the other pages.
    pub fn reload(&mut self) {
        self.tasks.reload();
        self.journal.reload();
        self.moods.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompassConfig;
    use crate::core::journal::JournalDraft;
    use crate::core::task::{Priority, TaskDraft};
    use crate::error::{Error, ValidationError};
    use crate::pages::{JournalPage, TasksPage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_reads_other_pages() {
        let store = Arc::new(EntityStore::in_memory());
        let today = date(2026, 10, 19);
        let mut tasks = TasksPage::mount(Arc::clone(&store), &CompassConfig::default());

        let mut due = TaskDraft::new("Pay rent");
        due.due_date = Some(today);
        tasks.save_task(due, None).unwrap();

        let mut late = TaskDraft::new("Renew passport");
        late.due_date = Some(date(2026, 10, 1));
        late.priority = Priority::Low;
        tasks.save_task(late, None).unwrap();

        let mut later = TaskDraft::new("Book flights");
        later.due_date = Some(date(2026, 11, 1));
        tasks.save_task(later, None).unwrap();

        let done = tasks.save_task(TaskDraft::new("Call mom"), None).unwrap();
        tasks.toggle_complete(done).unwrap();

        let mut journal = JournalPage::mount(Arc::clone(&store));
        journal
            .save_entry(JournalDraft::new("Today", "Wrote this."), None)
            .unwrap();

        let page = DashboardPage::mount(store);
        let summary = page.summary(chrono::Local::now().date_naive());
        assert_eq!(summary.tasks_total, 4);
        assert_eq!(summary.tasks_completed, 1);
        assert_eq!(summary.completion_rate, 25);
        assert_eq!(summary.journal_entries, 1);
        assert_eq!(summary.top_mood, None);

        let summary = page.summary(today);
        let titles: Vec<_> = summary.today_tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Renew passport", "Pay rent"]);
    }

    #[test]
    fn mood_is_one_entry_per_day() {
        let store = Arc::new(EntityStore::in_memory());
        let mut page = DashboardPage::mount(Arc::clone(&store));
        let today = date(2026, 10, 19);

        page.log_mood(today, 3).unwrap();
        page.log_mood(today, 4).unwrap();
        page.log_mood(date(2026, 10, 18), 4).unwrap();
        page.log_mood(date(2026, 10, 17), 2).unwrap();
        // Outside the window.
        page.log_mood(date(2026, 10, 1), 2).unwrap();
        page.log_mood(date(2026, 10, 2), 2).unwrap();

        assert_eq!(page.mood_for(today).unwrap().level, 4);
        assert_eq!(page.summary(today).top_mood, Some("Good"));

        let reopened = DashboardPage::mount(store);
        assert_eq!(reopened.mood_for(today).unwrap().label(), "Good");
    }

    #[test]
    fn mood_out_of_range_is_rejected() {
        let mut page = DashboardPage::mount(Arc::new(EntityStore::in_memory()));
        assert!(matches!(
            page.log_mood(date(2026, 10, 19), 6),
            Err(Error::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(page.log_mood(date(2026, 10, 19), 0).is_err());
        assert!(page.mood_for(date(2026, 10, 19)).is_none());
    }

    #[test]
    fn invalid_relog_keeps_earlier_mood() {
        let mut page = DashboardPage::mount(Arc::new(EntityStore::in_memory()));
        let today = date(2026, 10, 19);
        page.log_mood(today, 2).unwrap();
        assert!(page.log_mood(today, 9).is_err());
        assert_eq!(page.mood_for(today).unwrap().level, 2);
    }

    #[test]
    fn quote_is_stable_per_day() {
        let day = date(2026, 1, 1);
        assert_eq!(daily_quote(day), QUOTES[0]);
        assert_eq!(daily_quote(date(2026, 1, 9)), QUOTES[0]);
        assert_eq!(daily_quote(date(2026, 1, 2)).author, "Abraham Lincoln");
    }
}
