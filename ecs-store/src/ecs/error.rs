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
//! Error types for manager operations
//!
//! Adding a component or tag that is already present, or removing one that
//! is absent, is never an error. Those calls report `Ok(false)` instead.

use crate::ecs::Entity;
use thiserror::Error;

/// Errors raised by [`EntityManager`](crate::ecs::EntityManager) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The handle does not refer to a live entity of this manager
    #[error("{0} is not a live entity of this manager")]
    InvalidEntity(Entity),

    /// A component was looked up by name or id but was never registered
    #[error("unknown component type '{0}'")]
    UnknownComponent(String),

    /// The component type has no factory to build an instance with
    #[error("no factory installed for component '{0}'")]
    NoFactory(String),

    /// Two distinct component types share the same canonical name
    #[error("component name '{name}' is already registered by another type")]
    DuplicateComponentName {
        /// The colliding canonical (lower-cased) name
        name: String,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EcsError::InvalidEntity(Entity::new(3, 1));
        assert_eq!(err.to_string(), "Entity(3, gen: 1) is not a live entity of this manager");

        let err = EcsError::UnknownComponent("health".to_string());
        assert_eq!(err.to_string(), "unknown component type 'health'");

        let err = EcsError::DuplicateComponentName { name: "position".to_string() };
        assert!(err.to_string().contains("'position'"));
    }
}
