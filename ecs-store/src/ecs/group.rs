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
//! Incrementally maintained component-set groups
//!
//! A [`Group`] caches every live entity that has *at least* a given set of
//! components. Groups are built lazily by a full scan the first time a set is
//! queried; after that the manager keeps them exact on every attach, detach,
//! create and remove, and they are never rescanned or evicted.
//!
//! # Invariant
//!
//! For every cached group `g` and live entity `e`:
//! `e ∈ g.members() ⟺ g.key() ⊆ components(e)`.

use crate::ecs::component::{ComponentId, ComponentRegistry};
use crate::ecs::entity::EntityRecord;
use crate::ecs::Entity;
use std::collections::HashMap;

/// Canonical, order-independent key for a component set
///
/// The ids are sorted and de-duplicated, so `[A, B]`, `[B, A]` and
/// `[A, B, A]` all produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<ComponentId>);

impl GroupKey {
    /// Build the canonical key for `ids`
    pub fn new(ids: &[ComponentId]) -> Self {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        GroupKey(ids)
    }

    /// Sorted component ids of this key
    pub fn ids(&self) -> &[ComponentId] {
        &self.0
    }

    /// Whether the key requires `id`
    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Whether this is the empty set, which every entity satisfies
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the key as sorted canonical names joined by `,`
    pub fn describe(&self, registry: &ComponentRegistry) -> String {
        let mut names: Vec<&str> = self
            .0
            .iter()
            .map(|id| registry.name(*id).unwrap_or("?"))
            .collect();
        names.sort_unstable();
        names.join(",")
    }
}

/// Cached result for one component-set query
#[derive(Debug, Clone)]
pub struct Group {
    key: GroupKey,
    members: Vec<Entity>,
}

impl Group {
    fn new(key: GroupKey, members: Vec<Entity>) -> Self {
        Group { key, members }
    }

    /// The component set this group was built for
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Entities currently satisfying the key, in insertion order
    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Membership test (linear)
    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    fn push(&mut self, entity: Entity) {
        debug_assert!(!self.members.contains(&entity), "{} already in group", entity);
        self.members.push(entity);
    }

    fn remove(&mut self, entity: Entity) -> bool {
        match self.members.iter().position(|e| *e == entity) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// All cached groups of a manager, keyed by [`GroupKey`]
#[derive(Debug, Default)]
pub(crate) struct GroupIndex {
    groups: HashMap<GroupKey, Group>,
}

impl GroupIndex {
    pub(crate) fn get(&self, key: &GroupKey) -> Option<&Group> {
        self.groups.get(key)
    }

    /// Return the group for `key`, seeding it with `seed` on first use
    pub(crate) fn get_or_build(
        &mut self,
        key: GroupKey,
        seed: impl FnOnce(&GroupKey) -> Vec<Entity>,
    ) -> &Group {
        self.groups
            .entry(key)
            .or_insert_with_key(|key| Group::new(key.clone(), seed(key)))
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// A new entity has no components, so only the empty-set group gains it
    pub(crate) fn entity_created(&mut self, entity: Entity) {
        if let Some(group) = self.groups.get_mut(&GroupKey(Vec::new())) {
            group.push(entity);
        }
    }

    /// `record` already holds `added`
    ///
    /// Only groups requiring `added` can change: any other satisfied group
    /// already listed the entity before the attach.
    pub(crate) fn component_added(
        &mut self,
        entity: Entity,
        added: ComponentId,
        record: &EntityRecord,
    ) -> usize {
        let mut joined = 0;
        for group in self.groups.values_mut() {
            if group.key.contains(added) && record.has_all(group.key.ids()) {
                group.push(entity);
                joined += 1;
            }
        }
        joined
    }

    /// `record` still holds `removed`; membership is judged on that state
    pub(crate) fn component_removing(
        &mut self,
        entity: Entity,
        removed: ComponentId,
        record: &EntityRecord,
    ) -> usize {
        let mut left = 0;
        for group in self.groups.values_mut() {
            if group.key.contains(removed) && record.has_all(group.key.ids()) && group.remove(entity) {
                left += 1;
            }
        }
        left
    }

    /// Drop `entity` from every group its record satisfies
    pub(crate) fn entity_removing(&mut self, entity: Entity, record: &EntityRecord) {
        for group in self.groups.values_mut() {
            if record.has_all(group.key.ids()) {
                group.remove(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<ComponentId> {
        raw.iter().map(|r| ComponentId::new(*r)).collect()
    }

    #[test]
    fn test_key_is_order_independent() {
        assert_eq!(GroupKey::new(&ids(&[2, 0, 1])), GroupKey::new(&ids(&[1, 2, 0])));
        assert_eq!(GroupKey::new(&ids(&[1, 1, 0])), GroupKey::new(&ids(&[0, 1])));
    }

    #[test]
    fn test_key_contains() {
        let key = GroupKey::new(&ids(&[4, 2]));
        assert!(key.contains(ComponentId::new(2)));
        assert!(!key.contains(ComponentId::new(3)));
        assert!(GroupKey::new(&[]).is_empty());
    }

    #[test]
    fn test_component_added_only_touches_requiring_groups() {
        let a = ComponentId::new(0);
        let b = ComponentId::new(1);
        let e = Entity::new(0, 0);

        let mut index = GroupIndex::default();
        index.get_or_build(GroupKey::new(&[a]), |_| Vec::new());
        index.get_or_build(GroupKey::new(&[a, b]), |_| Vec::new());

        let mut record = EntityRecord::default();
        record.attach(a, Box::new(()));
        assert_eq!(index.component_added(e, a, &record), 1);

        record.attach(b, Box::new(()));
        assert_eq!(index.component_added(e, b, &record), 1);

        assert_eq!(index.get(&GroupKey::new(&[a])).unwrap().members(), &[e]);
        assert_eq!(index.get(&GroupKey::new(&[b, a])).unwrap().members(), &[e]);
    }

    #[test]
    fn test_component_removing_uses_pre_removal_state() {
        let a = ComponentId::new(0);
        let b = ComponentId::new(1);
        let e = Entity::new(0, 0);

        let mut record = EntityRecord::default();
        record.attach(a, Box::new(()));
        record.attach(b, Box::new(()));

        let mut index = GroupIndex::default();
        index.get_or_build(GroupKey::new(&[a]), |_| vec![e]);
        index.get_or_build(GroupKey::new(&[a, b]), |_| vec![e]);

        assert_eq!(index.component_removing(e, b, &record), 1);
        assert!(index.get(&GroupKey::new(&[a, b])).unwrap().is_empty());
        assert_eq!(index.get(&GroupKey::new(&[a])).unwrap().members(), &[e]);
    }

    #[test]
    fn test_empty_key_group_receives_new_entities() {
        let mut index = GroupIndex::default();
        index.get_or_build(GroupKey::new(&[]), |_| Vec::new());
        let e = Entity::new(7, 0);
        index.entity_created(e);
        assert_eq!(index.get(&GroupKey::new(&[])).unwrap().members(), &[e]);
    }
}
