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
//! Object pooling for component instances
//!
//! A [`ComponentPool`] keeps detached component instances around and hands
//! them out again instead of building fresh ones. Installed on a manager
//! with [`EntityManager::use_pool`](crate::ecs::EntityManager::use_pool), it
//! serves as both the factory and the recycler for one component type.
//!
//! Pools are single-threaded: clones share the same storage through
//! `Rc<RefCell<..>>`, matching the manager's threading model.

use crate::ecs::Component;
use std::cell::RefCell;
use std::rc::Rc;

/// Configuration for pool behavior
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of instances the free list pre-allocates room for
    pub initial_capacity: usize,
    /// Maximum number of idle instances kept; extra releases are dropped
    pub max_pool_size: usize,
    /// Whether to log when the pool has to build a new instance
    pub log_resize_events: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 64,
            max_pool_size: 1024,
            log_resize_events: false,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with custom settings
    pub fn new(initial_capacity: usize, max_pool_size: usize) -> Self {
        PoolConfig {
            initial_capacity,
            max_pool_size,
            log_resize_events: false,
        }
    }

    /// Enable logging for allocation events
    pub fn with_logging(mut self) -> Self {
        self.log_resize_events = true;
        self
    }
}

/// Statistics for monitoring pool performance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Number of times an instance was reused from the pool
    pub hits: usize,
    /// Number of times a new instance had to be built
    pub misses: usize,
    /// Number of released instances dropped because the pool was full
    pub discarded: usize,
    /// Current number of idle instances
    pub pool_size: usize,
    /// Peak number of idle instances
    pub peak_size: usize,
}

impl PoolStats {
    /// Calculate the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// A component type that can be reset and reused
///
/// The default `reset` restores `Default::default()`.
pub trait Poolable: Component + Default {
    /// Return the instance to a pristine state before reuse
    fn reset(&mut self) {
        *self = Self::default();
    }
}

struct PoolState<T> {
    free: Vec<T>,
    stats: PoolStats,
}

/// A pool of reusable component instances
pub struct ComponentPool<T: Poolable> {
    state: Rc<RefCell<PoolState<T>>>,
    config: PoolConfig,
}

impl<T: Poolable> ComponentPool<T> {
    /// Create a new pool with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a new pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        ComponentPool {
            state: Rc::new(RefCell::new(PoolState {
                free: Vec::with_capacity(config.initial_capacity),
                stats: PoolStats::default(),
            })),
            config,
        }
    }

    /// Take an idle instance, or build a new one if none is left
    pub fn acquire(&self) -> T {
        let mut state = self.state.borrow_mut();
        match state.free.pop() {
            Some(value) => {
                state.stats.hits += 1;
                state.stats.pool_size = state.free.len();
                value
            }
            None => {
                state.stats.misses += 1;
                if self.config.log_resize_events {
                    log::debug!(
                        "ComponentPool<{}>: building new instance (hit rate: {:.1}%)",
                        T::NAME,
                        state.stats.hit_rate()
                    );
                }
                T::default()
            }
        }
    }

    /// Reset `value` and keep it for reuse, unless the pool is full
    pub fn release(&self, mut value: T) {
        let mut state = self.state.borrow_mut();
        if state.free.len() >= self.config.max_pool_size {
            state.stats.discarded += 1;
            return;
        }
        value.reset();
        state.free.push(value);

        let len = state.free.len();
        state.stats.pool_size = len;
        if len > state.stats.peak_size {
            state.stats.peak_size = len;
        }
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        self.state.borrow().stats.clone()
    }

    /// Drop every idle instance
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.free.clear();
        state.stats.pool_size = 0;
    }

    /// Get the current number of idle instances
    pub fn len(&self) -> usize {
        self.state.borrow().free.len()
    }

    /// Check if the pool holds no idle instance
    pub fn is_empty(&self) -> bool {
        self.state.borrow().free.is_empty()
    }
}

impl<T: Poolable> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> Clone for ComponentPool<T> {
    fn clone(&self) -> Self {
        ComponentPool {
            state: Rc::clone(&self.state),
            config: self.config.clone(),
        }
    }
}
