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
//! Basic example walking through the store
//!
//! Run with `RUST_LOG=debug cargo run --example basic` to see group builds
//! and entity removals logged.

use ecs_store::ecs::components::{Position, Velocity};
use ecs_store::pool::ComponentPool;
use ecs_store::{EcsError, EntityManager, ManagerConfig};

fn main() -> Result<(), EcsError> {
    env_logger::init();

    println!("ecs-store - Basic Example");
    println!("=========================\n");

    let mut manager = EntityManager::with_config(ManagerConfig::from_env());
    let velocity_pool = ComponentPool::<Velocity>::new();
    manager.use_pool(&velocity_pool)?;

    let player = manager.create_entity();
    manager.insert_component(player, Position::new(0.0, 0.0))?;
    manager.insert_component(player, Velocity::new(1.0, 0.5))?;
    manager.add_tag(player, "player")?;

    for i in 0..3 {
        let enemy = manager.create_entity();
        let mut view = manager.entity_mut(enemy)?;
        view.insert(Position::new(10.0 * i as f32, 5.0))?;
        view.add_tag("enemy")?;
    }
    println!("Created {} entities", manager.count());

    // Integrate every moving entity for a few frames
    for _ in 0..3 {
        let moving = manager.query::<(Position, Velocity)>()?.to_vec();
        for entity in moving {
            let Some(velocity) = manager.get_component::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(position) = manager.get_component_mut::<Position>(entity) {
                position.advance(&velocity, 0.1);
            }
        }
    }
    if let Some(position) = manager.get_component::<Position>(player) {
        println!("Player moved to ({:.2}, {:.2})", position.x(), position.y());
    }

    println!("Positioned entities: {}", manager.query::<(Position,)>()?.len());
    println!("Enemies: {}", manager.query_tag("enemy").len());

    // Give the first enemy a velocity; the cached group picks it up
    let first_enemy = manager.query_tag("enemy")[0];
    manager.add_component::<Velocity>(first_enemy)?;
    println!("Moving entities: {}", manager.query::<(Velocity, Position)>()?.len());

    manager.remove_entity(first_enemy)?;
    manager.remove_entity(player)?;
    println!(
        "After removals: {} entities, {} moving, {} enemies",
        manager.count(),
        manager.query::<(Position, Velocity)>()?.len(),
        manager.query_tag("enemy").len()
    );
    println!("Velocity pool: {:?}", velocity_pool.stats());

    Ok(())
}
