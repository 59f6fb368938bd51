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
//! Entity manager
//!
//! The [`EntityManager`] owns every entity record, the component registry,
//! the group index and the tag index. It is the only place those indexes are
//! mutated: every create, remove, attach and detach goes through it and
//! updates the affected groups before returning.
//!
//! Queries hand out borrowed slices. A slice stays valid until the next
//! mutation, at which point the borrow checker forces callers to query
//! again and observe the updated membership. Call `.to_vec()` to keep a
//! snapshot.

use crate::config::ManagerConfig;
use crate::ecs::component::{BoxedComponent, Component, ComponentId, ComponentRegistry, ComponentSet};
use crate::ecs::entity::EntityArena;
use crate::ecs::error::{EcsError, Result};
use crate::ecs::facade::{EntityMut, EntityRef};
use crate::ecs::group::{Group, GroupIndex, GroupKey};
use crate::ecs::hooks::HookTable;
use crate::ecs::tag::TagIndex;
use crate::ecs::Entity;
use crate::pool::{ComponentPool, Poolable};
use log::{debug, trace};
use std::fmt;

/// The central entity-component-system store
///
/// # Example
///
/// ```
/// use ecs_store::ecs::EntityManager;
/// use ecs_store::ecs::components::{Position, Velocity};
///
/// let mut manager = EntityManager::new();
/// let e1 = manager.create_entity();
/// manager.add_component::<Position>(e1).unwrap();
/// assert_eq!(manager.query::<(Position,)>().unwrap(), &[e1]);
///
/// manager.add_component::<Velocity>(e1).unwrap();
/// assert_eq!(manager.query::<(Velocity, Position)>().unwrap(), &[e1]);
///
/// manager.remove_component::<Velocity>(e1).unwrap();
/// assert!(manager.query::<(Position, Velocity)>().unwrap().is_empty());
/// assert_eq!(manager.query::<(Position,)>().unwrap(), &[e1]);
/// ```
pub struct EntityManager {
    arena: EntityArena,
    registry: ComponentRegistry,
    groups: GroupIndex,
    tags: TagIndex,
    hooks: HookTable,
    config: ManagerConfig,
}

impl EntityManager {
    /// Create an empty manager with the default configuration
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// Create an empty manager with a custom configuration
    pub fn with_config(config: ManagerConfig) -> Self {
        EntityManager {
            arena: EntityArena::with_capacity(config.initial_capacity),
            registry: ComponentRegistry::new(),
            groups: GroupIndex::default(),
            tags: TagIndex::default(),
            hooks: HookTable::default(),
            config,
        }
    }

    /// The configuration this manager was built with
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Entity lifecycle
    // ---------------------------------------------------------------------

    /// Create a new entity with no components and no tags
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.arena.allocate();
        self.groups.entity_created(entity);
        self.hooks.entity_created(entity);
        trace!("created {}", entity);
        entity
    }

    /// Destroy an entity
    ///
    /// Removes it from every group and tag, then hands each attached
    /// component to its recycler and finally the entity to the entity
    /// recycler. The handle is invalid afterwards.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if `entity` is not live in this manager.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<()> {
        let record = self.arena.get(entity).ok_or(EcsError::InvalidEntity(entity))?;
        self.groups.entity_removing(entity, record);

        let mut record = self
            .arena
            .release(entity)
            .ok_or(EcsError::InvalidEntity(entity))?;
        for tag in record.take_tags() {
            self.tags.remove(&tag, entity);
        }

        let components = record.drain_components();
        let recycled = components.len();
        for (id, instance) in components {
            self.hooks.recycle(id, instance);
        }
        self.hooks.entity_recycled(entity);

        debug!("removed {} ({} components recycled)", entity, recycled);
        Ok(())
    }

    /// Number of live entities
    pub fn count(&self) -> usize {
        self.arena.len()
    }

    /// Check if an entity is live in this manager
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.arena.contains(entity)
    }

    /// Iterate over all live entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.arena.iter().map(|(entity, _)| entity)
    }

    /// Remove every live entity, running all recycle hooks
    ///
    /// Cached groups and tags stay registered and are left empty.
    pub fn clear(&mut self) {
        let live: Vec<Entity> = self.entities().collect();
        for entity in live {
            let removed = self.remove_entity(entity);
            debug_assert!(removed.is_ok());
        }
    }

    // ---------------------------------------------------------------------
    // Component types and hooks
    // ---------------------------------------------------------------------

    /// Register `T` and return its id
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentId> {
        self.registry.register::<T>()
    }

    /// Id of `T` if it has been registered
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.registry.id_of::<T>()
    }

    /// Case-insensitive id lookup by component name
    pub fn component_id_by_name(&self, name: &str) -> Option<ComponentId> {
        self.registry.lookup(name)
    }

    /// The component registry of this manager
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Build `T` instances with `factory` instead of `T::default()`
    pub fn set_component_factory<T, F>(&mut self, factory: F) -> Result<()>
    where
        T: Component,
        F: FnMut() -> T + 'static,
    {
        let id = self.registry.register::<T>()?;
        self.hooks.set_factory::<T, F>(id, factory);
        Ok(())
    }

    /// Hand detached `T` instances to `recycler` instead of dropping them
    pub fn set_component_recycler<T, F>(&mut self, recycler: F) -> Result<()>
    where
        T: Component,
        F: FnMut(T) + 'static,
    {
        let id = self.registry.register::<T>()?;
        self.hooks.set_recycler::<T, F>(id, recycler);
        Ok(())
    }

    /// Call `hook` once for every entity created from now on
    pub fn set_entity_factory(&mut self, hook: impl FnMut(Entity) + 'static) {
        self.hooks.set_entity_factory(Box::new(hook));
    }

    /// Call `hook` once for every entity removed from now on
    pub fn set_entity_recycler(&mut self, hook: impl FnMut(Entity) + 'static) {
        self.hooks.set_entity_recycler(Box::new(hook));
    }

    /// Serve and reclaim `T` instances through `pool`
    pub fn use_pool<T: Poolable>(&mut self, pool: &ComponentPool<T>) -> Result<()> {
        let factory_pool = pool.clone();
        let recycler_pool = pool.clone();
        self.set_component_factory(move || factory_pool.acquire())?;
        self.set_component_recycler(move |value: T| recycler_pool.release(value))
    }

    // ---------------------------------------------------------------------
    // Component attach / detach
    // ---------------------------------------------------------------------

    /// Attach a new `T` built by its factory
    ///
    /// Returns `Ok(false)` without touching anything if the entity already
    /// has `T`.
    pub fn add_component<T: Component + Default>(&mut self, entity: Entity) -> Result<bool> {
        let id = self.registry.register::<T>()?;
        self.hooks.ensure_default_factory::<T>(id);
        self.add_component_by_id(entity, id)
    }

    /// Attach a new instance of a registered type built by its factory
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if `entity` is not live
    /// - [`EcsError::UnknownComponent`] if `id` was never registered
    /// - [`EcsError::NoFactory`] if the type has no factory
    pub fn add_component_by_id(&mut self, entity: Entity, id: ComponentId) -> Result<bool> {
        let record = self.arena.get(entity).ok_or(EcsError::InvalidEntity(entity))?;
        if record.has_component(id) {
            return Ok(false);
        }
        if !self.registry.contains(id) {
            return Err(EcsError::UnknownComponent(id.to_string()));
        }
        let instance = match self.hooks.build(id) {
            Some(instance) => instance,
            None => return Err(EcsError::NoFactory(self.name_of(id))),
        };
        self.attach(entity, id, instance)?;
        Ok(true)
    }

    /// Attach a caller-built `value`
    ///
    /// If the entity already has a `T`, nothing changes and `value` is
    /// handed back as `Ok(Some(value))`.
    pub fn insert_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<Option<T>> {
        let id = self.registry.register::<T>()?;
        let record = self.arena.get(entity).ok_or(EcsError::InvalidEntity(entity))?;
        if record.has_component(id) {
            return Ok(Some(value));
        }
        self.attach(entity, id, Box::new(value))?;
        Ok(None)
    }

    fn attach(&mut self, entity: Entity, id: ComponentId, instance: BoxedComponent) -> Result<()> {
        let record = self
            .arena
            .get_mut(entity)
            .ok_or(EcsError::InvalidEntity(entity))?;
        record.attach(id, instance);
        let joined = self.groups.component_added(entity, id, record);
        trace!("attached {} to {} (joined {} groups)", id, entity, joined);
        Ok(())
    }

    /// Detach `T` from the entity and recycle it
    ///
    /// Returns `Ok(false)` if the entity does not have `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<bool> {
        match self.registry.id_of::<T>() {
            Some(id) => self.remove_component_by_id(entity, id),
            None if self.arena.contains(entity) => Ok(false),
            None => Err(EcsError::InvalidEntity(entity)),
        }
    }

    /// Detach the component `id` from the entity and recycle it
    ///
    /// Only groups whose key requires `id` are inspected; membership is
    /// decided on the component set as it was before the detach.
    pub fn remove_component_by_id(&mut self, entity: Entity, id: ComponentId) -> Result<bool> {
        let record = self.arena.get(entity).ok_or(EcsError::InvalidEntity(entity))?;
        if !record.has_component(id) {
            return Ok(false);
        }
        let left = self.groups.component_removing(entity, id, record);

        let record = self
            .arena
            .get_mut(entity)
            .ok_or(EcsError::InvalidEntity(entity))?;
        if let Some(instance) = record.detach(id) {
            self.hooks.recycle(id, instance);
        }
        trace!("detached {} from {} (left {} groups)", id, entity, left);
        Ok(true)
    }

    /// Borrow the entity's `T`
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.registry.id_of::<T>()?;
        self.arena.get(entity)?.get(id)?.downcast_ref::<T>()
    }

    /// Mutably borrow the entity's `T`
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.registry.id_of::<T>()?;
        self.arena.get_mut(entity)?.get_mut(id)?.downcast_mut::<T>()
    }

    /// Check if the entity has `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        match (self.registry.id_of::<T>(), self.arena.get(entity)) {
            (Some(id), Some(record)) => record.has_component(id),
            _ => false,
        }
    }

    /// Check if the entity has every component in `ids`
    pub fn has_all_components(&self, entity: Entity, ids: &[ComponentId]) -> bool {
        self.arena
            .get(entity)
            .is_some_and(|record| record.has_all(ids))
    }

    /// Component ids attached to the entity, in attachment order
    pub fn components_of(&self, entity: Entity) -> Result<&[ComponentId]> {
        self.arena
            .get(entity)
            .map(|record| record.components())
            .ok_or(EcsError::InvalidEntity(entity))
    }

    fn name_of(&self, id: ComponentId) -> String {
        self.registry
            .name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    // ---------------------------------------------------------------------
    // Group queries
    // ---------------------------------------------------------------------

    /// All live entities having at least the components in `ids`
    ///
    /// The first query for a given set scans every live entity; later
    /// queries for the same set (in any order) return the cached group,
    /// which is kept current by every mutation.
    pub fn query_components(&mut self, ids: &[ComponentId]) -> &[Entity] {
        let arena = &self.arena;
        let registry = &self.registry;
        let threshold = self.config.parallel_scan_threshold;

        self.groups
            .get_or_build(GroupKey::new(ids), |key| {
                let members = seed_group(arena, key, threshold);
                debug!(
                    "built group [{}] with {} members",
                    key.describe(registry),
                    members.len()
                );
                members
            })
            .members()
    }

    /// Typed form of [`query_components`](Self::query_components)
    pub fn query<S: ComponentSet>(&mut self) -> Result<&[Entity]> {
        let ids = S::register(&mut self.registry)?;
        Ok(self.query_components(&ids))
    }

    /// Query by component names, ignoring case
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownComponent`] for a name no type was registered with.
    pub fn query_names(&mut self, names: &[&str]) -> Result<&[Entity]> {
        let ids = names
            .iter()
            .map(|name| {
                self.registry
                    .lookup(name)
                    .ok_or_else(|| EcsError::UnknownComponent((*name).to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.query_components(&ids))
    }

    /// Cached members for `ids`, without building the group
    pub fn group(&self, ids: &[ComponentId]) -> Option<&[Entity]> {
        self.groups.get(&GroupKey::new(ids)).map(Group::members)
    }

    /// All cached groups
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Number of cached groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // ---------------------------------------------------------------------
    // Tags
    // ---------------------------------------------------------------------

    /// Tag the entity; `Ok(false)` if it already carries `tag`
    pub fn add_tag(&mut self, entity: Entity, tag: &str) -> Result<bool> {
        let record = self
            .arena
            .get_mut(entity)
            .ok_or(EcsError::InvalidEntity(entity))?;
        if !record.push_tag(tag) {
            return Ok(false);
        }
        self.tags.add(tag, entity);
        Ok(true)
    }

    /// Untag the entity; `Ok(false)` if it does not carry `tag`
    pub fn remove_tag(&mut self, entity: Entity, tag: &str) -> Result<bool> {
        let record = self
            .arena
            .get_mut(entity)
            .ok_or(EcsError::InvalidEntity(entity))?;
        if !record.pop_tag(tag) {
            return Ok(false);
        }
        self.tags.remove(tag, entity);
        Ok(true)
    }

    /// Entities carrying `tag`, in tagging order
    ///
    /// Unseen tags yield an empty slice, and are cached as empty entries
    /// when [`ManagerConfig::materialize_empty_tags`] is set.
    pub fn query_tag(&mut self, tag: &str) -> &[Entity] {
        if self.config.materialize_empty_tags {
            self.tags.materialize(tag)
        } else {
            self.tags.members(tag)
        }
    }

    /// Entities carrying `tag`, never creating an entry
    pub fn tagged(&self, tag: &str) -> &[Entity] {
        self.tags.members(tag)
    }

    /// Check if the entity carries `tag`
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.arena
            .get(entity)
            .is_some_and(|record| record.has_tag(tag))
    }

    /// Tags on the entity, in tagging order
    pub fn tags_of(&self, entity: Entity) -> Result<&[String]> {
        self.arena
            .get(entity)
            .map(|record| record.tags())
            .ok_or(EcsError::InvalidEntity(entity))
    }

    /// Every known tag with its members
    pub fn tag_entries(&self) -> impl Iterator<Item = (&str, &[Entity])> {
        self.tags.iter()
    }

    /// Number of tag entries, including cached empty ones
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Whether an entry exists for `tag`
    pub fn is_tag_known(&self, tag: &str) -> bool {
        self.tags.contains_tag(tag)
    }

    // ---------------------------------------------------------------------
    // Facade
    // ---------------------------------------------------------------------

    /// Read-only view of a live entity
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>> {
        if !self.arena.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        Ok(EntityRef::new(self, entity))
    }

    /// Mutable view of a live entity
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>> {
        if !self.arena.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        Ok(EntityMut::new(self, entity))
    }
}

fn seed_group(arena: &EntityArena, key: &GroupKey, parallel_threshold: usize) -> Vec<Entity> {
    #[cfg(feature = "parallel")]
    {
        if arena.slot_count() >= parallel_threshold {
            return arena.par_matching(key.ids());
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    arena
        .iter()
        .filter(|(_, record)| record.has_all(key.ids()))
        .map(|(entity, _)| entity)
        .collect()
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityManager")
            .field("entities", &self.arena.len())
            .field("slots", &self.arena.slot_count())
            .field("component_types", &self.registry.len())
            .field("groups", &self.groups.len())
            .field("tags", &self.tags.len())
            .field("config", &self.config)
            .finish()
    }
}
