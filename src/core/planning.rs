use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::{Collection, Entity};
use crate::error::ValidationError;

pub const DEFAULT_GOAL_CATEGORY: &str = "General";

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyGoal {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: String,
}

impl YearlyGoal {
    /// A blank category falls back to "General".
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            DEFAULT_GOAL_CATEGORY.to_string()
        } else {
            category.trim().to_string()
        };
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            category,
        }
    }
}

impl Entity for YearlyGoal {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::Required { field: "text" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyPlanner {
    pub year: i32,
    #[serde(default)]
    pub goals: Collection<YearlyGoal>,
}

impl YearlyPlanner {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            goals: Collection::new(),
        }
    }

    /// Planners for the current and the following year.
    pub fn defaults(today: NaiveDate) -> Vec<Self> {
        vec![Self::new(today.year()), Self::new(today.year() + 1)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub actions: String,
    #[serde(default)]
    pub reflections: String,
}

impl MonthlyPlan {
    pub fn is_blank(&self) -> bool {
        self.goals.trim().is_empty()
            && self.actions.trim().is_empty()
            && self.reflections.trim().is_empty()
    }
}

/// Exactly one plan per calendar month, stored as an object keyed by month name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, MonthlyPlan>",
    into = "BTreeMap<String, MonthlyPlan>"
)]
pub struct MonthlyPlans {
    plans: [MonthlyPlan; 12],
}

pub fn month_index(name: &str) -> Option<usize> {
    MONTHS.iter().position(|m| m.eq_ignore_ascii_case(name.trim()))
}

/// The month after `name`, wrapping December to January.
pub fn next_month(name: &str) -> Option<&'static str> {
    month_index(name).map(|i| MONTHS[(i + 1) % 12])
}

pub fn month_of(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

impl MonthlyPlans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, month: &str) -> Option<&MonthlyPlan> {
        month_index(month).map(|i| &self.plans[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MonthlyPlan)> {
        MONTHS.iter().copied().zip(self.plans.iter())
    }

    /// Replace one month's plan. Unknown month names leave the plans unchanged.
    pub fn update(&self, month: &str, plan: MonthlyPlan) -> Self {
        let mut next = self.clone();
        match month_index(month) {
            Some(i) => next.plans[i] = plan,
            None => log::debug!("Unknown month {:?}", month),
        }
        next
    }

    pub fn planned_months(&self) -> usize {
        self.plans.iter().filter(|p| !p.is_blank()).count()
    }
}

impl From<BTreeMap<String, MonthlyPlan>> for MonthlyPlans {
    fn from(mut map: BTreeMap<String, MonthlyPlan>) -> Self {
        let mut plans = Self::default();
        for (i, month) in MONTHS.iter().enumerate() {
            if let Some(plan) = map.remove(*month) {
                plans.plans[i] = plan;
            }
        }
        if !map.is_empty() {
            log::warn!("Dropping unknown months from monthly plans: {:?}", map.keys());
        }
        plans
    }
}

impl From<MonthlyPlans> for BTreeMap<String, MonthlyPlan> {
    fn from(plans: MonthlyPlans) -> Self {
        MONTHS
            .iter()
            .map(|m| m.to_string())
            .zip(plans.plans)
            .collect()
    }
}
