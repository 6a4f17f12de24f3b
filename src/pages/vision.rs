use std::sync::Arc;

use uuid::Uuid;

use super::SyncedState;
use crate::aggregate::{overall_milestone_progress, percent};
use crate::collection::Collection;
use crate::core::vision::{LifeArea, MILESTONE_YEARS, Milestones, validate_milestone_year};
use crate::store::{EntityStore, keys};

#[derive(Debug)]
pub struct VisionPage {
    areas: SyncedState<Collection<LifeArea>>,
}

impl VisionPage {
    pub fn mount(store: Arc<EntityStore>) -> Self {
        Self {
            areas: SyncedState::mount(store, keys::LIFE_AREAS, || {
                Collection::from_items(LifeArea::defaults())
            }),
        }
    }

    pub fn areas(&self) -> &Collection<LifeArea> {
        self.areas.get()
    }

    /// Save the area editor: vision text and all ten milestones at once.
    pub fn update_area(&mut self, id: Uuid, vision: &str, milestones: Milestones) -> crate::Result<()> {
        let next = self.areas.get().try_update(&id, |area| {
            area.vision = vision.to_string();
            area.milestones = milestones;
        })?;
        self.areas.apply(|_| next)?;
        Ok(())
    }

    pub fn toggle_milestone(&mut self, id: Uuid, year: u8) -> crate::Result<()> {
        validate_milestone_year(year)?;
        self.areas.apply(|areas| {
            areas.update(&id, |area| {
                if let Some(m) = area.milestone_mut(year) {
                    m.completed = !m.completed;
                }
            })
        })?;
        Ok(())
    }

    pub fn set_milestone_text(&mut self, id: Uuid, year: u8, text: &str) -> crate::Result<()> {
        validate_milestone_year(year)?;
        self.areas.apply(|areas| {
            areas.update(&id, |area| {
                if let Some(m) = area.milestone_mut(year) {
                    m.text = text.to_string();
                }
            })
        })?;
        Ok(())
    }

    pub fn area_progress(&self, id: Uuid) -> Option<u8> {
        self.areas
            .get()
            .get(&id)
            .map(|area| percent(area.completed_milestones(), MILESTONE_YEARS))
    }

    pub fn overall_progress(&self) -> u8 {
        overall_milestone_progress(self.areas.get().as_slice())
    }

    pub fn reload(&mut self) {
        self.areas.reload();
    }
}
