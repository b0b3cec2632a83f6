//! Collision detection and resolution
//!
//! Three passes run once per tick in a fixed order: craft vs obstacles,
//! projectiles vs obstacles, craft vs power-ups. Removals are recorded by
//! entity ID while iterating and compacted afterwards, so indices never
//! shift under a running loop.

use glam::Vec2;

use super::craft::HitOutcome;
use super::state::{GameEvent, SoundCue, World};
use crate::consts::CRAFT_HIT_FACTOR;
use crate::score_for_radius;

/// Summary of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Outcome of the craft's obstacle contact, if it touched one
    pub craft_hit: Option<HitOutcome>,
    pub obstacles_destroyed: usize,
    pub power_ups_collected: usize,
}

/// Whether two centres are closer than `reach`
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}

/// Run all collision passes against the world
pub fn resolve(world: &mut World) -> CollisionReport {
    CollisionReport {
        craft_hit: craft_vs_obstacles(world),
        obstacles_destroyed: projectiles_vs_obstacles(world),
        power_ups_collected: craft_vs_power_ups(world),
    }
}

/// First obstacle in storage order that touches the craft delivers the hit.
///
/// Storage order, not distance, picks the obstacle; at most one hit per tick.
fn craft_vs_obstacles(world: &mut World) -> Option<HitOutcome> {
    if world.craft.is_protected() {
        return None;
    }

    let craft_pos = world.craft.pos;
    let craft_radius = world.craft.radius;
    let touching = world.obstacles.iter().any(|o| {
        within_reach(craft_pos, o.pos, craft_radius + o.radius * CRAFT_HIT_FACTOR)
    });
    if !touching {
        return None;
    }

    Some(
        world
            .craft
            .hit(&mut world.session, &world.viewport, &mut world.events),
    )
}

/// Each projectile destroys at most one obstacle, scanning both lists from
/// the back. Fragments join the obstacle list immediately and can be hit by
/// later projectiles in the same pass.
fn projectiles_vs_obstacles(world: &mut World) -> usize {
    let mut spent_projectiles: Vec<u32> = Vec::new();
    let mut destroyed_obstacles: Vec<u32> = Vec::new();

    for p in (0..world.projectiles.len()).rev() {
        let projectile = &world.projectiles[p];
        let (p_id, p_pos, p_radius) = (projectile.id, projectile.pos, projectile.radius);

        let target = (0..world.obstacles.len()).rev().find(|&o| {
            let obstacle = &world.obstacles[o];
            !destroyed_obstacles.contains(&obstacle.id)
                && within_reach(p_pos, obstacle.pos, p_radius + obstacle.radius)
        });
        let Some(o) = target else {
            continue;
        };

        let obstacle = &world.obstacles[o];
        let radius = obstacle.radius;
        destroyed_obstacles.push(obstacle.id);
        spent_projectiles.push(p_id);

        let children = obstacle.split(&mut world.ids, &mut world.rng, world.obstacle_speed);
        let child_count = children.len();
        world.obstacles.extend(children);

        if world.session.add_score(score_for_radius(radius)) {
            world
                .events
                .push(GameEvent::HighScoreChanged(world.session.high_score));
        }
        world.events.push(GameEvent::ScoreChanged(world.session.score));
        world.events.push(GameEvent::Sound(SoundCue::Explosion));
        world.events.push(GameEvent::ObstacleDestroyed {
            radius,
            children: child_count,
        });
        log::debug!("Obstacle r={:.1} destroyed, {} fragments", radius, child_count);
    }

    world
        .projectiles
        .retain(|p| !spent_projectiles.contains(&p.id));
    world
        .obstacles
        .retain(|o| !destroyed_obstacles.contains(&o.id));

    destroyed_obstacles.len()
}

/// Every power-up touching the craft is collected, back to front
fn craft_vs_power_ups(world: &mut World) -> usize {
    let mut collected: Vec<u32> = Vec::new();

    for i in (0..world.power_ups.len()).rev() {
        let power_up = &world.power_ups[i];
        if within_reach(
            world.craft.pos,
            power_up.pos,
            world.craft.radius + power_up.radius,
        ) {
            world.craft.collect_power_up(power_up.kind, &mut world.events);
            collected.push(power_up.id);
        }
    }

    world.power_ups.retain(|p| !collected.contains(&p.id));
    collected.len()
}
