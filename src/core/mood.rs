use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::Entity;
use crate::error::ValidationError;

pub const MOOD_LABELS: [&str; 5] = ["Very Low", "Low", "Neutral", "Good", "Excellent"];

/// One mood reading per day, 1 (very low) to 5 (excellent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub level: u8,
}

impl MoodEntry {
    pub fn new(date: NaiveDate, level: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            level,
        }
    }

    pub fn label(&self) -> &'static str {
        mood_label(self.level).unwrap_or("Unknown")
    }
}

pub fn mood_label(level: u8) -> Option<&'static str> {
    MOOD_LABELS.get(usize::from(level).checked_sub(1)?).copied()
}

pub fn validate_level(level: u8) -> Result<(), ValidationError> {
    if mood_label(level).is_some() {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "mood",
            value: i64::from(level),
            min: 1,
            max: MOOD_LABELS.len() as i64,
        })
    }
}

impl Entity for MoodEntry {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_level(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_by_level() {
        assert_eq!(mood_label(1), Some("Very Low"));
        assert_eq!(mood_label(5), Some("Excellent"));
        assert_eq!(mood_label(0), None);
        assert_eq!(mood_label(6), None);
    }

    #[test]
    fn level_range() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(MoodEntry::new(today, 3).validate().is_ok());
        assert!(matches!(
            MoodEntry::new(today, 9).validate(),
            Err(ValidationError::OutOfRange { field: "mood", .. })
        ));
    }
}
