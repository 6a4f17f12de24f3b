use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::Entity;
use crate::error::ValidationError;

/// One milestone per year of the ten-year horizon.
pub const MILESTONE_YEARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// 1 through 10.
    pub year: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

pub type Milestones = [Milestone; MILESTONE_YEARS];

pub fn blank_milestones() -> Milestones {
    std::array::from_fn(|i| Milestone {
        year: i as u8 + 1,
        text: String::new(),
        completed: false,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeArea {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vision: String,
    pub milestones: Milestones,
    #[serde(default)]
    pub icon_color: String,
}

impl LifeArea {
    pub fn new(name: &str, description: &str, icon_color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            vision: String::new(),
            milestones: blank_milestones(),
            icon_color: icon_color.to_string(),
        }
    }

    pub fn milestone_mut(&mut self, year: u8) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.year == year)
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// The seven areas a new vision board starts with.
    pub fn defaults() -> Vec<Self> {
        [
            ("Health", "Physical, mental, and emotional well-being", "green"),
            ("Career", "Professional growth and fulfillment", "blue"),
            ("Finances", "Financial security and freedom", "amber"),
            ("Relationships", "Meaningful connections with others", "pink"),
            ("Spirituality", "Connection to something larger than yourself", "purple"),
            ("Growth", "Personal development and learning", "cyan"),
            ("Leisure", "Recreation, hobbies, and enjoyment", "orange"),
        ]
        .into_iter()
        .map(|(name, description, color)| Self::new(name, description, color))
        .collect()
    }
}

pub fn validate_milestone_year(year: u8) -> Result<(), ValidationError> {
    if (1..=MILESTONE_YEARS as u8).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "year",
            value: i64::from(year),
            min: 1,
            max: MILESTONE_YEARS as i64,
        })
    }
}

impl Entity for LifeArea {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        Ok(())
    }

    fn normalize(&mut self) {
        // Years are positional; a stray year number must not break lookups.
        for (i, milestone) in self.milestones.iter_mut().enumerate() {
            milestone.year = i as u8 + 1;
        }
    }
}
