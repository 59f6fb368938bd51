//! Entity Component System (ECS) core implementation
//!
//! This module provides:
//! - Generational entity handles and their arena
//! - Component type registration
//! - Cached, incrementally maintained component-set groups
//! - The tag index
//! - The [`EntityManager`] tying them together, plus entity facades

mod entity;
mod component;
mod error;
mod facade;
mod group;
mod hooks;
mod manager;
mod tag;

/// Example components used by docs, tests and benchmarks
pub mod components;

pub use component::{canonical_name, Component, ComponentId, ComponentRegistry, ComponentSet};
pub use entity::{Entity, EntityId};
pub use error::{EcsError, Result};
pub use facade::{EntityMut, EntityRef};
pub use group::{Group, GroupKey};
pub use manager::EntityManager;
