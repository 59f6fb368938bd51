// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Entity handles and the arena that stores entity records
//!
//! An [`Entity`] is a lightweight handle: an arena slot index plus a
//! generation counter. The record behind it (attached components, stored
//! instances, tags) lives in the manager's entity arena. Destroying an
//! entity bumps the slot generation so stale handles never resolve to a
//! newer entity that reuses the slot.

use crate::ecs::component::{BoxedComponent, ComponentId};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for an entity slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Create a new EntityId from a raw u64 value
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Entity handle with generational index support for safe references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: EntityId,
    generation: u32,
}

impl Entity {
    /// Create a new entity with the given ID and generation
    pub fn new(id: u64, generation: u32) -> Self {
        Entity {
            id: EntityId::new(id),
            generation,
        }
    }

    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen: {})", self.id.0, self.generation)
    }
}

/// Per-entity state: attached component types, their instances and tags
///
/// `components` and the keys of `data` are kept in 1:1 correspondence.
#[derive(Default)]
pub(crate) struct EntityRecord {
    components: Vec<ComponentId>,
    data: HashMap<ComponentId, BoxedComponent>,
    tags: Vec<String>,
}

impl EntityRecord {
    pub(crate) fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub(crate) fn tags(&self) -> &[String] {
        &self.tags
    }

    pub(crate) fn has_component(&self, id: ComponentId) -> bool {
        self.data.contains_key(&id)
    }

    /// O(|ids|) superset test
    pub(crate) fn has_all(&self, ids: &[ComponentId]) -> bool {
        ids.iter().all(|id| self.data.contains_key(id))
    }

    pub(crate) fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub(crate) fn get(&self, id: ComponentId) -> Option<&BoxedComponent> {
        self.data.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut BoxedComponent> {
        self.data.get_mut(&id)
    }

    /// Attach an instance. The caller has already checked the type is absent.
    pub(crate) fn attach(&mut self, id: ComponentId, instance: BoxedComponent) {
        debug_assert!(!self.data.contains_key(&id));
        self.components.push(id);
        self.data.insert(id, instance);
    }

    /// Detach an instance, returning it if it was attached
    pub(crate) fn detach(&mut self, id: ComponentId) -> Option<BoxedComponent> {
        let instance = self.data.remove(&id)?;
        if let Some(pos) = self.components.iter().position(|c| *c == id) {
            self.components.remove(pos);
        }
        debug_assert_eq!(self.components.len(), self.data.len());
        Some(instance)
    }

    /// Detach every instance in attachment order
    pub(crate) fn drain_components(&mut self) -> Vec<(ComponentId, BoxedComponent)> {
        let mut drained = Vec::with_capacity(self.components.len());
        for id in self.components.drain(..) {
            if let Some(instance) = self.data.remove(&id) {
                drained.push((id, instance));
            }
        }
        drained
    }

    pub(crate) fn push_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub(crate) fn pop_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_tags(&mut self) -> Vec<String> {
        std::mem::take(&mut self.tags)
    }
}

struct Slot {
    generation: u32,
    record: Option<EntityRecord>,
}

/// Generational arena owning every entity record of a manager
///
/// Freed slots are reused in LIFO order with their generation incremented.
pub(crate) struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    alive: usize,
}

impl EntityArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        EntityArena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            alive: 0,
        }
    }

    /// Allocate a slot for a fresh, empty record
    pub(crate) fn allocate(&mut self) -> Entity {
        self.alive += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.record = Some(EntityRecord::default());
            return Entity::new(index as u64, slot.generation);
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            record: Some(EntityRecord::default()),
        });
        Entity::new(index as u64, 0)
    }

    /// Release the slot behind `entity`, returning its record
    ///
    /// Returns `None` if the handle is stale or was never allocated.
    pub(crate) fn release(&mut self, entity: Entity) -> Option<EntityRecord> {
        let slot = self.slots.get_mut(entity.index())?;
        if slot.generation != entity.generation() {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(entity.index() as u32);
        self.alive -= 1;
        Some(record)
    }

    pub(crate) fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    pub(crate) fn get(&self, entity: Entity) -> Option<&EntityRecord> {
        let slot = self.slots.get(entity.index())?;
        if slot.generation != entity.generation() {
            return None;
        }
        slot.record.as_ref()
    }

    pub(crate) fn get_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        let slot = self.slots.get_mut(entity.index())?;
        if slot.generation != entity.generation() {
            return None;
        }
        slot.record.as_mut()
    }

    /// Number of live entities
    pub(crate) fn len(&self) -> usize {
        self.alive
    }

    /// Number of slots, live or free
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live entities in slot order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Entity, &EntityRecord)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.record
                .as_ref()
                .map(|record| (Entity::new(index as u64, slot.generation), record))
        })
    }

    /// Live entities whose record holds every id in `ids`, in slot order
    #[cfg(feature = "parallel")]
    pub(crate) fn par_matching(&self, ids: &[ComponentId]) -> Vec<Entity> {
        use rayon::prelude::*;

        self.slots
            .par_iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.record {
                Some(record) if record.has_all(ids) => {
                    Some(Entity::new(index as u64, slot.generation))
                }
                _ => None,
            })
            .collect()
    }
}
