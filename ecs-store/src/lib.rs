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
//! # ecs-store
//!
//! An entity-component-system store with incrementally maintained indexes.
//!
//! ## Features
//!
//! - **Generational entities**: handles are slot index plus generation, so a
//!   destroyed handle never resolves again
//! - **Group index**: the first query for a component set scans once; every
//!   later attach, detach, create and remove keeps the cached result exact
//! - **Tag index**: string labels with insertion-ordered member lists
//! - **Hooks**: per-type factories and recyclers, plus entity hooks
//! - **Pooling**: reusable component instances via [`pool::ComponentPool`]
//! - **Parallelization**: optional Rayon seeding of large new groups
//!
//! ## Example
//!
//! ```rust
//! use ecs_store::ecs::EntityManager;
//! use ecs_store::ecs::components::{Position, Velocity};
//!
//! let mut manager = EntityManager::new();
//! let entity = manager.create_entity();
//! manager.add_component::<Position>(entity).unwrap();
//! manager.add_component::<Velocity>(entity).unwrap();
//! manager.add_tag(entity, "player").unwrap();
//!
//! assert_eq!(manager.query::<(Position, Velocity)>().unwrap(), &[entity]);
//! assert_eq!(manager.query_tag("player"), &[entity]);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Manager configuration
pub mod config;

/// Component instance pooling
pub mod pool;

pub use config::ManagerConfig;
pub use ecs::{EcsError, Entity, EntityManager};
