//! Generic id-keyed collection with pure reducers.
//!
//! Every entity kind (tasks, journal entries, goals, playlists, ...) is stored
//! as a `Collection<T>`. Reducers take `&self` and return the next collection,
//! so a controller can swap the whole value and persist it in one write.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Where `add` places a new item. Display order is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Prepend,
    Append,
}

pub trait Entity: Clone {
    type Id: Clone + Eq + Hash + std::fmt::Debug;

    const INSERTION: Insertion = Insertion::Append;

    fn id(&self) -> &Self::Id;

    /// Replace the id with a newly generated one.
    fn assign_fresh_id(&mut self);

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Recompute cached derived fields. Runs after every mutation and on load.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw items: later duplicates of an id are dropped and every
    /// item is normalized.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for mut item in items {
            if !seen.insert(item.id().clone()) {
                log::warn!("Dropping duplicate id {:?}", item.id());
                continue;
            }
            item.normalize();
            kept.push(item);
        }
        Self { items: kept }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    /// Insert `item` under a fresh id. Returns the new collection and that id.
    pub fn add_with_id(&self, mut item: T) -> (Self, T::Id) {
        item.assign_fresh_id();
        while self.contains(item.id()) {
            item.assign_fresh_id();
        }
        item.normalize();
        let id = item.id().clone();

        let mut items = Vec::with_capacity(self.items.len() + 1);
        match T::INSERTION {
            Insertion::Prepend => {
                items.push(item);
                items.extend(self.items.iter().cloned());
            }
            Insertion::Append => {
                items.extend(self.items.iter().cloned());
                items.push(item);
            }
        }
        (Self { items }, id)
    }

    pub fn add(&self, item: T) -> Self {
        self.add_with_id(item).0
    }

    /// Apply `patch` to the item with `id`. Absent ids leave the collection
    /// unchanged, as does a patch that tries to change the id.
    pub fn update(&self, id: &T::Id, patch: impl FnOnce(&mut T)) -> Self {
        let Some(pos) = self.items.iter().position(|item| item.id() == id) else {
            log::debug!("Update target {:?} not found", id);
            return self.clone();
        };

        let mut updated = self.items[pos].clone();
        patch(&mut updated);
        if updated.id() != id {
            log::warn!("Patch changed id {:?}, ignoring", id);
            return self.clone();
        }
        updated.normalize();

        let mut items = self.items.clone();
        items[pos] = updated;
        Self { items }
    }

    /// `add_with_id` for items that must pass `T::validate` first.
    pub fn try_add(&self, item: T) -> Result<(Self, T::Id), ValidationError> {
        item.validate()?;
        Ok(self.add_with_id(item))
    }

    /// `update` that refuses a patch leaving the item invalid. Absent ids are
    /// still a no-op.
    pub fn try_update(&self, id: &T::Id, patch: impl FnOnce(&mut T)) -> Result<Self, ValidationError> {
        let next = self.update(id, patch);
        if let Some(item) = next.get(id) {
            item.validate()?;
        }
        Ok(next)
    }

    /// Remove the item with `id`. Absent ids are a no-op.
    pub fn remove(&self, id: &T::Id) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Flip the boolean selected by `field` on the item with `id`.
    pub fn toggle(&self, id: &T::Id, field: fn(&mut T) -> &mut bool) -> Self {
        self.update(id, |item| {
            let flag = field(item);
            *flag = !*flag;
        })
    }

    /// Replace the item that shares `item`'s id, or append it keeping its id.
    pub fn upsert(&self, mut item: T) -> Self {
        item.normalize();
        let mut items = self.items.clone();
        match items.iter().position(|existing| existing.id() == item.id()) {
            Some(pos) => items[pos] = item,
            None => items.push(item),
        }
        Self { items }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Entity> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Entity + Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_items)
    }
}
