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
//! Manager configuration
//!
//! [`ManagerConfig`] can be built in code or read from the environment:
//!
//! ```bash
//! export ECS_STORE_INITIAL_CAPACITY=1024
//! export ECS_STORE_PARALLEL_SCAN_THRESHOLD=8192
//! ```

/// Environment variable overriding [`ManagerConfig::initial_capacity`]
pub const INITIAL_CAPACITY_VAR: &str = "ECS_STORE_INITIAL_CAPACITY";

/// Environment variable overriding [`ManagerConfig::parallel_scan_threshold`]
pub const PARALLEL_SCAN_THRESHOLD_VAR: &str = "ECS_STORE_PARALLEL_SCAN_THRESHOLD";

/// Configuration for [`EntityManager`](crate::ecs::EntityManager) behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Number of entity slots to pre-allocate
    pub initial_capacity: usize,
    /// Whether querying an unseen tag caches an empty entry for it
    pub materialize_empty_tags: bool,
    /// Minimum number of entity slots before a group is seeded on the
    /// rayon pool (only with the `parallel` feature)
    pub parallel_scan_threshold: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            initial_capacity: 64,
            materialize_empty_tags: true,
            parallel_scan_threshold: 4096,
        }
    }
}

impl ManagerConfig {
    /// Create a configuration with a custom initial capacity
    pub fn new(initial_capacity: usize) -> Self {
        ManagerConfig {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Do not cache entries for tags that were only ever queried
    pub fn without_empty_tag_caching(mut self) -> Self {
        self.materialize_empty_tags = false;
        self
    }

    /// Set the slot count from which group seeding runs in parallel
    pub fn with_parallel_scan_threshold(mut self, threshold: usize) -> Self {
        self.parallel_scan_threshold = threshold;
        self
    }

    /// Read overrides from the environment, falling back to defaults
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = parse_var(&lookup, INITIAL_CAPACITY_VAR) {
            config.initial_capacity = value;
        }
        if let Some(value) = parse_var(&lookup, PARALLEL_SCAN_THRESHOLD_VAR) {
            config.parallel_scan_threshold = value;
        }
        config
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring {}={:?}: {}", name, raw, err);
            None
        }
    }
}
