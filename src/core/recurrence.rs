use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repeat schedule offered by the task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPattern {
    Daily,
    /// Monday through Friday.
    Weekdays,
    Weekly,
    Monthly,
}

impl RecurringPattern {
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekdays, Self::Weekly, Self::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekdays => "weekdays",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekdays" => Some(Self::Weekdays),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// The first occurrence strictly after `date`.
    pub fn next_after(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date + chrono::Duration::days(1),
            Self::Weekdays => {
                let mut next = date + chrono::Duration::days(1);
                while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                    next += chrono::Duration::days(1);
                }
                next
            }
            Self::Weekly => date + chrono::Duration::weeks(1),
            Self::Monthly => add_months(date, 1),
        }
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total_months = date.month0() + months;
    let new_year = date.year() + (total_months / 12) as i32;
    let new_month = (total_months % 12) + 1;
    // Clamp day to valid range for the new month
    let new_day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

impl fmt::Display for RecurringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
