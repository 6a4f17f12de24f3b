use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::SyncedState;
use crate::aggregate::completion_rate;
use crate::collection::Collection;
use crate::core::planning::{MonthlyPlan, MonthlyPlans, YearlyGoal, YearlyPlanner, month_index};
use crate::error::ValidationError;
use crate::store::{EntityStore, keys};

#[derive(Debug)]
pub struct PlanningPage {
    planners: SyncedState<Vec<YearlyPlanner>>,
    monthly: SyncedState<MonthlyPlans>,
}

impl PlanningPage {
    /// A fresh store starts with planners for `today`'s year and the next.
    pub fn mount(store: Arc<EntityStore>, today: NaiveDate) -> Self {
        Self {
            planners: SyncedState::mount(Arc::clone(&store), keys::YEARLY_PLANNERS, move || {
                YearlyPlanner::defaults(today)
            }),
            monthly: SyncedState::mount(store, keys::MONTHLY_PLANS, MonthlyPlans::new),
        }
    }

    pub fn planner(&self, year: i32) -> Option<&YearlyPlanner> {
        self.planners.get().iter().find(|p| p.year == year)
    }

    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.planners.get().iter().map(|p| p.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn monthly_plans(&self) -> &MonthlyPlans {
        self.monthly.get()
    }

    /// Add a planner for `year`. Known years are left alone.
    pub fn add_year(&mut self, year: i32) -> crate::Result<()> {
        if self.planner(year).is_some() {
            return Ok(());
        }
        self.planners.apply(|planners| {
            let mut next = planners.clone();
            next.push(YearlyPlanner::new(year));
            next.sort_by_key(|p| p.year);
            next
        })?;
        log::info!("Added planner for {}", year);
        Ok(())
    }

    /// Replace the goals of `year` with `f(goals)`. When `create` is set a
    /// missing year gets a planner first; otherwise a missing year is a no-op.
    /// The planner list is saved once, after `f` succeeds.
    fn edit_goals<R>(
        &mut self,
        year: i32,
        create: bool,
        f: impl FnOnce(&Collection<YearlyGoal>) -> Result<(Collection<YearlyGoal>, R), ValidationError>,
    ) -> crate::Result<Option<R>> {
        let mut planners = self.planners.get().clone();
        let pos = match planners.iter().position(|p| p.year == year) {
            Some(pos) => pos,
            None if create => {
                planners.push(YearlyPlanner::new(year));
                planners.sort_by_key(|p| p.year);
                log::info!("Added planner for {}", year);
                planners.iter().position(|p| p.year == year).unwrap_or_default()
            }
            None => {
                log::debug!("No planner for {}", year);
                return Ok(None);
            }
        };

        let (goals, out) = f(&planners[pos].goals)?;
        planners[pos].goals = goals;
        self.planners.apply(|_| planners)?;
        Ok(Some(out))
    }

    /// Add a goal to `year`, creating that year's planner if needed.
    pub fn add_goal(&mut self, year: i32, text: &str, category: &str) -> crate::Result<Uuid> {
        let goal = YearlyGoal::new(text.trim(), category);
        let added = self.edit_goals(year, true, |goals| goals.try_add(goal))?;
        Ok(added.unwrap_or_default())
    }

    pub fn toggle_goal(&mut self, year: i32, id: Uuid) -> crate::Result<()> {
        self.edit_goals(year, false, |goals| Ok((goals.toggle(&id, |g| &mut g.completed), ())))?;
        Ok(())
    }

    pub fn update_goal(&mut self, year: i32, id: Uuid, text: &str, category: &str) -> crate::Result<()> {
        let edited = YearlyGoal::new(text.trim(), category);
        self.edit_goals(year, false, |goals| {
            let next = goals.try_update(&id, |goal| {
                goal.text = edited.text;
                goal.category = edited.category;
            })?;
            Ok((next, ()))
        })?;
        Ok(())
    }

    pub fn remove_goal(&mut self, year: i32, id: Uuid) -> crate::Result<()> {
        self.edit_goals(year, false, |goals| Ok((goals.remove(&id), ())))?;
        Ok(())
    }

    pub fn update_month(&mut self, month: &str, plan: MonthlyPlan) -> crate::Result<()> {
        if month_index(month).is_none() {
            return Err(ValidationError::UnknownTarget {
                kind: "month",
                id: month.to_string(),
            }
            .into());
        }
        self.monthly.apply(|plans| plans.update(month, plan))?;
        Ok(())
    }

    /// Completed goals over all goals for `year`. Unknown years give 0.
    pub fn year_progress(&self, year: i32) -> u8 {
        self.planner(year)
            .map_or(0, |p| completion_rate(p.goals.as_slice(), |g| g.completed))
    }

    pub fn reload(&mut self) {
        self.planners.reload();
        self.monthly.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn page() -> (Arc<EntityStore>, PlanningPage) {
        let store = Arc::new(EntityStore::in_memory());
        (Arc::clone(&store), PlanningPage::mount(store, today()))
    }

    #[test]
    fn starts_with_this_year_and_next() {
        let (_store, page) = page();
        assert_eq!(page.available_years(), vec![2026, 2027]);
        assert!(page.planner(2026).unwrap().goals.is_empty());
        assert_eq!(page.monthly_plans().planned_months(), 0);
    }

    #[test]
    fn goals_round_trip_through_store() {
        let (store, mut page) = page();
        let run = page.add_goal(2026, "Run a marathon", "Health").unwrap();
        let read = page.add_goal(2026, "Read 20 books", "").unwrap();
        page.toggle_goal(2026, run).unwrap();

        let planner = page.planner(2026).unwrap();
        assert_eq!(planner.goals.ids(), vec![run, read]);
        assert_eq!(planner.goals.get(&read).unwrap().category, "General");
        assert_eq!(page.year_progress(2026), 50);

        let reopened = PlanningPage::mount(store, today());
        assert_eq!(reopened.planner(2026), page.planner(2026));
    }

    #[test]
    fn edit_and_remove_goal() {
        let (_store, mut page) = page();
        let id = page.add_goal(2027, "Learn Spanish", "Growth").unwrap();
        page.update_goal(2027, id, "Learn Portuguese", " ").unwrap();
        let goal = page.planner(2027).unwrap().goals.get(&id).unwrap();
        assert_eq!(goal.text, "Learn Portuguese");
        assert_eq!(goal.category, "General");

        page.remove_goal(2027, id).unwrap();
        assert!(page.planner(2027).unwrap().goals.is_empty());
        assert_eq!(page.year_progress(2027), 0);
    }

    #[test]
    fn blank_goal_is_rejected() {
        let (_store, mut page) = page();
        assert!(matches!(
            page.add_goal(2026, "  ", "Health"),
            Err(Error::Validation(ValidationError::Required { field: "text" }))
        ));
    }

    #[test]
    fn failed_save_keeps_goal_and_new_year() {
        let store = Arc::new(EntityStore::new(MemoryBackend::with_quota(4)));
        let mut page = PlanningPage::mount(store, today());
        let err = page.add_goal(2031, "Learn to sail", "Leisure").unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(page.available_years(), vec![2026, 2027, 2031]);
        assert_eq!(page.planner(2031).unwrap().goals.len(), 1);
    }

    #[test]
    fn editing_goal_to_blank_is_rejected() {
        let (_store, mut page) = page();
        let id = page.add_goal(2026, "Run", "Health").unwrap();
        assert!(page.update_goal(2026, id, " ", "Health").is_err());
        assert_eq!(page.planner(2026).unwrap().goals.get(&id).unwrap().text, "Run");
    }

    #[test]
    fn goal_for_new_year_adds_planner() {
        let (_store, mut page) = page();
        page.add_goal(2030, "Sail somewhere", "Leisure").unwrap();
        assert_eq!(page.available_years(), vec![2026, 2027, 2030]);
        page.add_year(2028).unwrap();
        page.add_year(2028).unwrap();
        assert_eq!(page.available_years(), vec![2026, 2027, 2028, 2030]);
    }

    #[test]
    fn monthly_plans_update_one_month() {
        let (store, mut page) = page();
        let plan = MonthlyPlan {
            goals: "Finish the draft".to_string(),
            ..MonthlyPlan::default()
        };
        page.update_month("March", plan.clone()).unwrap();
        assert_eq!(page.monthly_plans().get("March"), Some(&plan));
        assert!(page.monthly_plans().get("April").unwrap().is_blank());

        assert!(matches!(
            page.update_month("Smarch", plan),
            Err(Error::Validation(ValidationError::UnknownTarget { kind: "month", .. }))
        ));
        let reopened = PlanningPage::mount(store, today());
        assert_eq!(reopened.monthly_plans().planned_months(), 1);
    }
}
