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
//! Component type identity and registration
//!
//! Components are plain data records identified by a stable name rather than
//! by reflection. Every component type declares [`Component::NAME`]; the
//! [`ComponentRegistry`] hands out a dense [`ComponentId`] per type on first
//! use and guarantees that no two distinct types share a canonical name.
//!
//! Canonical names are lower-cased, which makes name-based queries
//! case-insensitive.

use crate::ecs::error::{EcsError, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Type-erased component instance as stored on an entity
pub(crate) type BoxedComponent = Box<dyn Any + Send + Sync>;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
///
/// # Example
///
/// ```
/// use ecs_store::ecs::Component;
///
/// #[derive(Debug, Default)]
/// struct Health(u32);
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Stable, deterministic name of this component type
    ///
    /// Must be unique (ignoring case) among the types used with one manager.
    const NAME: &'static str;
}

/// Dense identifier assigned to a component type by a [`ComponentRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create an id from a raw index
    pub fn new(index: u32) -> Self {
        ComponentId(index)
    }

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.0)
    }
}

/// Canonical key for a component name: the name lower-cased
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}

/// Registry mapping component types to ids and canonical names
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentId>,
    by_name: HashMap<String, ComponentId>,
    names: Vec<String>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`, or return its existing id
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponentName`] if another type already uses the
    /// same canonical name.
    pub fn register<T: Component>(&mut self) -> Result<ComponentId> {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.by_type.get(&type_id) {
            return Ok(id);
        }

        let name = canonical_name(T::NAME);
        if self.by_name.contains_key(&name) {
            return Err(EcsError::DuplicateComponentName { name });
        }

        let id = ComponentId::new(self.names.len() as u32);
        self.by_type.insert(type_id, id);
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        log::trace!("registered component '{}' as {}", T::NAME, id);
        Ok(id)
    }

    /// Id of `T` if it has been registered
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Case-insensitive lookup by name
    pub fn lookup(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(&canonical_name(name)).copied()
    }

    /// Canonical name of a registered id
    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Check whether `id` was handed out by this registry
    pub fn contains(&self, id: ComponentId) -> bool {
        id.index() < self.names.len()
    }

    /// Number of registered component types
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no component type has been registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A statically known set of component types, used by typed queries
///
/// Implemented for tuples of up to eight components:
///
/// ```
/// use ecs_store::ecs::EntityManager;
/// use ecs_store::ecs::components::{Position, Velocity};
///
/// let mut manager = EntityManager::new();
/// let moving = manager.query::<(Position, Velocity)>().unwrap();
/// assert!(moving.is_empty());
/// ```
pub trait ComponentSet {
    /// Register every member type and return their ids
    fn register(registry: &mut ComponentRegistry) -> Result<Vec<ComponentId>>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn register(registry: &mut ComponentRegistry) -> Result<Vec<ComponentId>> {
                Ok(vec![$(registry.register::<$name>()?),+])
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
