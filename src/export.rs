use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::core::journal::JournalEntry;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A downloadable markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub content: String,
}

/// Lowercase the title and turn each whitespace run into a single dash.
pub fn slugify(title: &str) -> String {
    WHITESPACE_RUN.replace_all(&title.to_lowercase(), "-").into_owned()
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long form date, e.g. "March 1st, 2026".
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

pub fn export_entry(entry: &JournalEntry) -> ExportedDocument {
    let mut content = String::new();
    content.push_str(&format!("# {}\n", entry.title));
    content.push_str(&format!("Date: {}\n", long_date(entry.day())));
    content.push_str(&format!("Tags: {}\n", entry.tags.join(", ")));
    content.push('\n');
    content.push_str(&entry.content);

    ExportedDocument {
        filename: format!("{}-{}.md", entry.day().format("%Y-%m-%d"), slugify(&entry.title)),
        content,
    }
}
