use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::{Entity, Insertion};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// When the entry was first written.
    #[serde(with = "super::timestamp::rfc3339")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            date: super::timestamp::now(),
            tags: Vec::new(),
        }
    }

    /// Local calendar day the entry was written on.
    pub fn day(&self) -> NaiveDate {
        super::timestamp::local_day(&self.date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The first `max_chars` characters, with `...` when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.content.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.content[..cut]),
            None => self.content.clone(),
        }
    }
}

/// Trim tags, drop empties and repeats (first occurrence wins).
pub fn clean_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

impl Entity for JournalEntry {
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
        if self.content.trim().is_empty() {
            return Err(ValidationError::Required { field: "content" });
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.tags = clean_tags(std::mem::take(&mut self.tags));
    }
}

/// The editor's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl JournalDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn into_entry(self, date: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id: Uuid::nil(),
            title: self.title,
            content: self.content,
            date,
            tags: clean_tags(self.tags),
        }
    }

    /// Replace title, content and tags. The original date is kept.
    pub fn apply_to(&self, entry: &mut JournalEntry) {
        entry.title = self.title.clone();
        entry.content = self.content.clone();
        entry.tags = clean_tags(self.tags.iter().cloned());
    }
}
