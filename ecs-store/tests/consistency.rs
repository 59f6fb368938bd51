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
//! Index consistency under random interleavings
//!
//! Drives a manager through seeded random sequences of create, remove,
//! attach, detach, tag and query calls and checks after every step that each
//! cached group and tag list matches a from-scratch evaluation.

use ecs_store::ecs::components::{Position, Velocity};
use ecs_store::ecs::{Component, ComponentId, Entity, EntityManager};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Default)]
struct Health;

impl Component for Health {
    const NAME: &'static str = "Health";
}

#[derive(Debug, Default)]
struct Armor;

impl Component for Armor {
    const NAME: &'static str = "Armor";
}

const TAGS: [&str; 3] = ["enemy", "player", "boss"];

fn assert_groups_consistent(manager: &EntityManager) {
    let live: Vec<Entity> = manager.entities().collect();
    for group in manager.groups() {
        for &entity in &live {
            let expected = manager.has_all_components(entity, group.key().ids());
            assert_eq!(
                group.contains(entity),
                expected,
                "{} membership in group {:?} is wrong",
                entity,
                group.key()
            );
        }
        for member in group.members() {
            assert!(manager.is_alive(*member), "dead {} left in group", member);
        }
        let mut unique = group.members().to_vec();
        unique.sort_by_key(|e| (e.id(), e.generation()));
        unique.dedup();
        assert_eq!(unique.len(), group.len(), "duplicate members in {:?}", group.key());
    }
}

fn assert_tags_consistent(manager: &EntityManager) {
    for (tag, members) in manager.tag_entries() {
        for entity in manager.entities() {
            assert_eq!(members.contains(&entity), manager.has_tag(entity, tag));
        }
        assert!(members.iter().all(|e| manager.is_alive(*e)));
    }
    for entity in manager.entities() {
        for tag in manager.tags_of(entity).unwrap() {
            assert_eq!(
                manager.tagged(tag).iter().filter(|e| **e == entity).count(),
                1
            );
        }
    }
}

fn random_entity(rng: &mut StdRng, manager: &EntityManager) -> Option<Entity> {
    let live: Vec<Entity> = manager.entities().collect();
    if live.is_empty() {
        None
    } else {
        Some(live[rng.gen_range(0..live.len())])
    }
}

fn random_query(rng: &mut StdRng, ids: &[ComponentId]) -> Vec<ComponentId> {
    ids.iter().copied().filter(|_| rng.gen_bool(0.5)).collect()
}

fn run_interleaving(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut manager = EntityManager::new();
    let ids = vec![
        manager.register_component::<Position>().unwrap(),
        manager.register_component::<Velocity>().unwrap(),
        manager.register_component::<Health>().unwrap(),
        manager.register_component::<Armor>().unwrap(),
    ];

    for _ in 0..steps {
        let target = random_entity(&mut rng, &manager);
        match (rng.gen_range(0..10), target) {
            (0, _) | (_, None) => {
                manager.create_entity();
            }
            (1, Some(entity)) => {
                let before = manager.count();
                manager.remove_entity(entity).unwrap();
                assert_eq!(manager.count(), before - 1);
            }
            (2, Some(entity)) => {
                manager.add_component::<Position>(entity).unwrap();
            }
            (3, Some(entity)) => {
                manager.add_component::<Velocity>(entity).unwrap();
            }
            (4, Some(entity)) => {
                manager.add_component::<Health>(entity).unwrap();
                manager.add_component::<Armor>(entity).unwrap();
            }
            (5, Some(entity)) => {
                let id = ids[rng.gen_range(0..ids.len())];
                manager.remove_component_by_id(entity, id).unwrap();
            }
            (6, Some(entity)) => {
                let tag = TAGS[rng.gen_range(0..TAGS.len())];
                manager.add_tag(entity, tag).unwrap();
            }
            (7, Some(entity)) => {
                let tag = TAGS[rng.gen_range(0..TAGS.len())];
                manager.remove_tag(entity, tag).unwrap();
            }
            (8, _) => {
                let query = random_query(&mut rng, &ids);
                manager.query_components(&query);
            }
            (_, _) => {
                let tag = TAGS[rng.gen_range(0..TAGS.len())];
                manager.query_tag(tag);
            }
        }

        assert_groups_consistent(&manager);
        assert_tags_consistent(&manager);
    }
}

#[test]
fn test_random_interleavings_keep_indexes_consistent() {
    for seed in 0..16 {
        run_interleaving(seed, 400);
    }
}

#[test]
fn test_groups_built_late_match_groups_built_early() {
    let mut manager = EntityManager::new();
    let pos = manager.register_component::<Position>().unwrap();
    let vel = manager.register_component::<Velocity>().unwrap();

    // Cache this group before any entity exists
    manager.query_components(&[pos, vel]);

    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let e = manager.create_entity();
        if rng.gen_bool(0.6) {
            manager.add_component::<Position>(e).unwrap();
        }
        if rng.gen_bool(0.6) {
            manager.add_component::<Velocity>(e).unwrap();
        }
        if rng.gen_bool(0.2) {
            manager.remove_component::<Position>(e).unwrap();
        }
    }

    let incremental = manager.group(&[pos, vel]).unwrap().to_vec();

    // A fresh manager-side scan over the same state
    let mut scanned: Vec<Entity> = manager
        .entities()
        .filter(|e| manager.has_all_components(*e, &[pos, vel]))
        .collect();
    let mut sorted = incremental.clone();
    sorted.sort_by_key(|e| e.id());
    scanned.sort_by_key(|e| e.id());
    assert_eq!(sorted, scanned);
}

#[test]
fn test_parallel_seeding_matches_sequential() {
    use ecs_store::ManagerConfig;

    let build = |threshold: usize| {
        let mut manager = EntityManager::with_config(
            ManagerConfig::default().with_parallel_scan_threshold(threshold),
        );
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let e = manager.create_entity();
            if rng.gen_bool(0.5) {
                manager.add_component::<Position>(e).unwrap();
            }
            if rng.gen_bool(0.1) {
                manager.remove_entity(e).unwrap();
            }
        }
        manager.query::<(Position,)>().unwrap().to_vec()
    };

    assert_eq!(build(0), build(usize::MAX));
}
