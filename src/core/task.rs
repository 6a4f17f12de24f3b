use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurringPattern;
use crate::collection::{Entity, Insertion};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-text project label.
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "super::timestamp::due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            project: String::new(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            recurring: false,
            recurring_pattern: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Incomplete and due today or earlier.
    pub fn is_due_by(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date.is_some_and(|due| due <= today)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date.is_some_and(|due| due < today)
    }

    /// Move a recurring task to its next occurrence and reopen it.
    /// Returns false for tasks that do not repeat.
    pub fn advance_recurrence(&mut self, today: NaiveDate) -> bool {
        let Some(pattern) = self.recurring_pattern.filter(|_| self.recurring) else {
            return false;
        };
        let from = self.due_date.map_or(today, |due| due.max(today));
        self.due_date = Some(pattern.next_after(from));
        self.completed = false;
        true
    }
}

impl Entity for Task {
    type Id = Uuid;

    const INSERTION: Insertion = Insertion::Prepend;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if !self.recurring {
            self.recurring_pattern = None;
        }
    }
}

/// The task form's fields. Used both to create a task and to edit one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub project: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub recurring: bool,
    pub recurring_pattern: Option<RecurringPattern>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn pattern(&self) -> Option<RecurringPattern> {
        // The form defaults the pattern to daily once recurring is switched on.
        self.recurring
            .then(|| self.recurring_pattern.unwrap_or(RecurringPattern::Daily))
    }

    /// A new, incomplete task. The id is replaced when added to a collection.
    pub fn into_task(self) -> Task {
        let recurring_pattern = self.pattern();
        Task {
            id: Uuid::nil(),
            title: self.title,
            description: self.description,
            project: self.project,
            priority: self.priority,
            due_date: self.due_date,
            completed: false,
            recurring: self.recurring,
            recurring_pattern,
        }
    }

    /// Merge the form fields into an existing task, keeping id and completion.
    pub fn apply_to(&self, task: &mut Task) {
        task.title = self.title.clone();
        task.description = self.description.clone();
        task.project = self.project.clone();
        task.priority = self.priority;
        task.due_date = self.due_date;
        task.recurring = self.recurring;
        task.recurring_pattern = self.pattern();
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            project: task.project.clone(),
            priority: task.priority,
            due_date: task.due_date,
            recurring: task.recurring,
            recurring_pattern: task.recurring_pattern,
        }
    }
}
