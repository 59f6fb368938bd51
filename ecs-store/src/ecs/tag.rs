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
//! Tag index
//!
//! Tags are free-form string labels. The index maps each tag to the
//! entities carrying it, in the order they were tagged.

use crate::ecs::Entity;
use std::collections::HashMap;

/// Lazily populated map from tag to member entities
#[derive(Debug, Default)]
pub(crate) struct TagIndex {
    tags: HashMap<String, Vec<Entity>>,
}

impl TagIndex {
    /// Add `entity` under `tag`, creating the list if needed
    pub(crate) fn add(&mut self, tag: &str, entity: Entity) -> bool {
        let members = self.tags.entry(tag.to_string()).or_default();
        if members.contains(&entity) {
            return false;
        }
        members.push(entity);
        true
    }

    /// Remove `entity` from `tag`; false if the list or the member is absent
    pub(crate) fn remove(&mut self, tag: &str, entity: Entity) -> bool {
        let Some(members) = self.tags.get_mut(tag) else {
            return false;
        };
        match members.iter().position(|e| *e == entity) {
            Some(pos) => {
                members.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Members of `tag` without creating an entry
    pub(crate) fn members(&self, tag: &str) -> &[Entity] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Members of `tag`, caching an empty list for unseen tags
    pub(crate) fn materialize(&mut self, tag: &str) -> &[Entity] {
        self.tags.entry(tag.to_string()).or_default()
    }

    pub(crate) fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub(crate) fn len(&self) -> usize {
        self.tags.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &[Entity])> {
        self.tags.iter().map(|(tag, members)| (tag.as_str(), members.as_slice()))
    }
}
