//! World state and core simulation types
//!
//! The `World` is the single owner of every live entity. Nothing holds a
//! reference to another entity; the viewport is copied where it is needed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::craft::Craft;
use super::entities::{BackgroundParticle, PowerUp, PowerUpKind, Projectile};
use super::obstacle::Obstacle;
use super::spawn::{self, SpawnScheduler};
use crate::consts::*;

/// Playfield bounds shared read-only by every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Toroidal wrap: leaving one edge re-enters at the opposite edge
    #[inline]
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        self.wrap_with_margin(pos, 0.0)
    }

    /// Wrap with the bounds pushed outward by `margin` on every side
    pub fn wrap_with_margin(&self, mut pos: Vec2, margin: f32) -> Vec2 {
        if pos.x < -margin {
            pos.x = self.width + margin;
        } else if pos.x > self.width + margin {
            pos.x = -margin;
        }
        if pos.y < -margin {
            pos.y = self.height + margin;
        } else if pos.y > self.height + margin {
            pos.y = -margin;
        }
        pos
    }

    /// Whether `pos` lies inside the bounds grown by `margin`
    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// Named sound notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Explosion,
    PowerUp,
}

impl SoundCue {
    /// Event name understood by notification sinks
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::Explosion => "explosion",
            SoundCue::PowerUp => "powerUp",
        }
    }
}

/// Things that happened during a tick, drained by the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    ScoreChanged(u64),
    HighScoreChanged(u64),
    LivesChanged(u32),
    /// Craft was hit but had a respawn left
    CraftRespawned,
    /// Craft was hit with no lives or respawns left; game over must follow
    CraftDestroyed,
    ObstacleDestroyed { radius: f32, children: usize },
    PowerUpCollected(PowerUpKind),
}

/// Score, lives and respawn bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub lives: u32,
    pub respawn_count: u32,
    pub max_respawns: u32,
    pub high_score: u64,
    /// Set once the craft is destroyed for good; further hits are ignored
    pub game_over_pending: bool,
}

impl Session {
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            respawn_count: 0,
            max_respawns: MAX_RESPAWNS,
            high_score,
            game_over_pending: false,
        }
    }

    /// Zero the run, keeping the high score
    pub fn reset(&mut self) {
        *self = Self::new(self.high_score);
    }

    /// Add points; returns true if the high score moved
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// No lives left or the respawn allowance is used up
    pub fn is_spent(&self) -> bool {
        self.lives == 0 || self.respawn_count >= self.max_respawns
    }
}

/// Monotonic entity ID allocator
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub viewport: Viewport,
    pub craft: Craft,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    /// Cosmetic only, never collides
    pub particles: Vec<BackgroundParticle>,
    pub session: Session,
    pub spawner: SpawnScheduler,
    /// Global obstacle speed multiplier
    pub obstacle_speed: f32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) ids: EntityIds,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create a fresh world with default tuning
    pub fn new(viewport: Viewport, seed: u64, high_score: u64) -> Self {
        Self::with_tuning(viewport, seed, high_score, 1.0, CRAFT_THRUST)
    }

    pub fn with_tuning(
        viewport: Viewport,
        seed: u64,
        high_score: u64,
        obstacle_speed: f32,
        craft_thrust: f32,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..STAR_COUNT)
            .map(|_| BackgroundParticle::random(&viewport, &mut rng))
            .collect();

        let mut world = Self {
            viewport,
            craft: Craft::new(viewport.center(), craft_thrust),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            particles,
            session: Session::new(high_score),
            spawner: SpawnScheduler::new(),
            obstacle_speed,
            events: Vec::new(),
            ids: EntityIds::default(),
            rng,
        };
        world.populate();
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Replace the craft, clear every collection and zero the session.
    ///
    /// The high score, tuning, starfield and the spawner's difficulty ramp
    /// survive a reset.
    pub fn reset(&mut self) {
        self.craft = Craft::new(self.viewport.center(), self.craft.thrust);
        self.clear_transients();
        self.session.reset();
        self.spawner.restart();
        self.events.clear();
        self.populate();
    }

    /// Drop obstacles, projectiles and power-ups
    pub fn clear_transients(&mut self) {
        self.obstacles.clear();
        self.projectiles.clear();
        self.power_ups.clear();
    }

    fn populate(&mut self) {
        for _ in 0..INITIAL_OBSTACLES {
            self.spawn_obstacle();
        }
    }

    /// Spawn one obstacle outside the central exclusion zone
    pub fn spawn_obstacle(&mut self) {
        let id = self.ids.next_id();
        let pos = spawn::sample_outside_exclusion(&self.viewport, &mut self.rng);
        let obstacle = Obstacle::random(id, pos, self.obstacle_speed, &mut self.rng);
        log::debug!(
            "Spawned obstacle {} r={:.1} at ({:.0}, {:.0})",
            id,
            obstacle.radius,
            pos.x,
            pos.y
        );
        self.obstacles.push(obstacle);
    }

    /// Spawn one power-up anywhere with a coin-flip kind
    pub fn spawn_power_up(&mut self) {
        let id = self.ids.next_id();
        let pos = spawn::sample_anywhere(&self.viewport, &mut self.rng);
        let kind = if self.rng.random_bool(0.5) {
            PowerUpKind::RapidFire
        } else {
            PowerUpKind::Shield
        };
        log::debug!("Spawned {:?} power-up {}", kind, id);
        self.power_ups.push(PowerUp::new(id, pos, kind));
    }

    /// Change the obstacle speed multiplier, rescaling live obstacles
    pub fn set_obstacle_speed(&mut self, multiplier: f32) {
        self.obstacle_speed = multiplier;
        for obstacle in &mut self.obstacles {
            obstacle.apply_speed_multiplier(multiplier);
        }
    }

    /// Change craft thrust; takes effect on the next tick
    pub fn set_craft_thrust(&mut self, thrust: f32) {
        self.craft.thrust = thrust;
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
