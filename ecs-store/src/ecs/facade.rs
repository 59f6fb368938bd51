//! Entity-side convenience views
//!
//! [`EntityRef`] and [`EntityMut`] bundle a manager borrow with a handle so
//! call sites can write `manager.entity_mut(e)?.add_tag("enemy")`. Every
//! method forwards to the [`EntityManager`] and behaves exactly like the
//! corresponding manager call.

use crate::ecs::component::{Component, ComponentId};
use crate::ecs::error::Result;
use crate::ecs::{Entity, EntityManager};

/// Read-only view of one live entity
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    manager: &'a EntityManager,
    entity: Entity,
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(manager: &'a EntityManager, entity: Entity) -> Self {
        EntityRef { manager, entity }
    }

    /// The underlying handle
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Borrow the entity's `T`
    pub fn get<T: Component>(&self) -> Option<&'a T> {
        self.manager.get_component::<T>(self.entity)
    }

    /// Check if the entity has `T`
    pub fn has_component<T: Component>(&self) -> bool {
        self.manager.has_component::<T>(self.entity)
    }

    /// Check if the entity has every component in `ids`
    pub fn has_all_components(&self, ids: &[ComponentId]) -> bool {
        self.manager.has_all_components(self.entity, ids)
    }

    /// Check if the entity carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.manager.has_tag(self.entity, tag)
    }

    /// Attached component ids
    pub fn components(&self) -> Result<&'a [ComponentId]> {
        self.manager.components_of(self.entity)
    }

    /// Attached tags
    pub fn tags(&self) -> Result<&'a [String]> {
        self.manager.tags_of(self.entity)
    }
}

/// Mutable view of one live entity
pub struct EntityMut<'a> {
    manager: &'a mut EntityManager,
    entity: Entity,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(manager: &'a mut EntityManager, entity: Entity) -> Self {
        EntityMut { manager, entity }
    }

    /// The underlying handle
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// See [`EntityManager::add_component`]
    pub fn add_component<T: Component + Default>(&mut self) -> Result<bool> {
        self.manager.add_component::<T>(self.entity)
    }

    /// See [`EntityManager::insert_component`]
    pub fn insert<T: Component>(&mut self, value: T) -> Result<Option<T>> {
        self.manager.insert_component(self.entity, value)
    }

    /// See [`EntityManager::remove_component`]
    pub fn remove_component<T: Component>(&mut self) -> Result<bool> {
        self.manager.remove_component::<T>(self.entity)
    }

    /// See [`EntityManager::add_tag`]
    pub fn add_tag(&mut self, tag: &str) -> Result<bool> {
        self.manager.add_tag(self.entity, tag)
    }

    /// See [`EntityManager::remove_tag`]
    pub fn remove_tag(&mut self, tag: &str) -> Result<bool> {
        self.manager.remove_tag(self.entity, tag)
    }

    /// Borrow the entity's `T`
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.manager.get_component::<T>(self.entity)
    }

    /// Mutably borrow the entity's `T`
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.manager.get_component_mut::<T>(self.entity)
    }

    /// Check if the entity has `T`
    pub fn has_component<T: Component>(&self) -> bool {
        self.manager.has_component::<T>(self.entity)
    }

    /// Check if the entity has every component in `ids`
    pub fn has_all_components(&self, ids: &[ComponentId]) -> bool {
        self.manager.has_all_components(self.entity, ids)
    }

    /// Check if the entity carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.manager.has_tag(self.entity, tag)
    }

    /// Destroy the entity, consuming the view
    pub fn despawn(self) -> Result<()> {
        self.manager.remove_entity(self.entity)
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::components::{Position, Velocity};
    use crate::ecs::{EcsError, EntityManager};

    #[test]
    fn test_facade_forwards_to_manager() {
        let mut manager = EntityManager::new();
        let e = manager.create_entity();

        {
            let mut view = manager.entity_mut(e).unwrap();
            assert!(view.add_component::<Position>().unwrap());
            assert!(!view.add_component::<Position>().unwrap());
            assert!(view.add_tag("player").unwrap());
            view.get_mut::<Position>().unwrap().set_y(4.0);
        }

        assert!(manager.has_tag(e, "player"));
        assert_eq!(manager.get_component::<Position>(e).unwrap().y(), 4.0);
        assert_eq!(manager.query::<(Position,)>().unwrap(), &[e]);

        let view = manager.entity(e).unwrap();
        assert!(view.has_component::<Position>());
        assert!(!view.has_component::<Velocity>());
        assert_eq!(view.tags().unwrap(), &["player".to_string()]);
    }

    #[test]
    fn test_facade_despawn() {
        let mut manager = EntityManager::new();
        let e = manager.create_entity();
        manager.entity_mut(e).unwrap().despawn().unwrap();
        assert_eq!(manager.count(), 0);
        assert_eq!(manager.entity(e).err(), Some(EcsError::InvalidEntity(e)));
    }
}
