//! One simulation step
//!
//! Order: craft, projectiles, obstacles, power-ups, starfield, collisions,
//! spawning. Positions integrate per tick; timers scale with `dt_ms`.

use serde::{Deserialize, Serialize};

use super::collision::{self, CollisionReport};
use super::entities::Projectile;
use super::state::World;

/// Player intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Rotate counter-clockwise
    pub left: bool,
    /// Rotate clockwise
    pub right: bool,
    /// Accelerate along the facing direction
    pub thrust: bool,
    /// Accelerate against the facing direction
    pub reverse: bool,
    pub fire: bool,
}

impl Intent {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Advance the world by one tick of `dt_ms` milliseconds.
///
/// `now_ms` is the wall-clock reading that drives the starfield twinkle.
pub fn tick(world: &mut World, intent: &Intent, dt_ms: f32, now_ms: f64) -> CollisionReport {
    let viewport = world.viewport;

    if let Some(shot) = world
        .craft
        .update(intent, dt_ms, &viewport, &mut world.events)
    {
        let id = world.next_entity_id();
        world
            .projectiles
            .push(Projectile::new(id, shot.origin, shot.velocity));
    }

    for projectile in &mut world.projectiles {
        projectile.update(&viewport);
    }
    world.projectiles.retain(|p| !p.is_expired());

    for obstacle in &mut world.obstacles {
        obstacle.update(&viewport);
    }

    for power_up in &mut world.power_ups {
        power_up.update(dt_ms);
    }
    world.power_ups.retain(|p| !p.is_expired());

    for particle in &mut world.particles {
        particle.update(now_ms, &viewport);
    }

    let report = collision::resolve(world);

    let spawns = world
        .spawner
        .advance(dt_ms, world.obstacles.len(), world.power_ups.len());
    if spawns.obstacle {
        world.spawn_obstacle();
    }
    if spawns.power_up {
        world.spawn_power_up();
    }

    report
}
