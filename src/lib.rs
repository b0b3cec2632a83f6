//! Asteroid Shooter - a wrapping-playfield arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, spawning, per-tick update)
//! - `game`: Play/pause/reset state machine driving the simulation
//! - `renderer`: Tessellation of world state into coloured triangles
//! - `platform`: Clocks and input mapping
//! - `persistence`: Key-value storage back ends
//! - `audio`: Fire-and-forget sound notification sinks

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AudioError, SettingsError, StorageError};
pub use game::{FrameToken, Game, GameSummary, HudSink, LoopPhase};
pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Velocities are in units per tick, timers in milliseconds.
pub mod consts {
    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Craft defaults
    pub const CRAFT_RADIUS: f32 = 15.0;
    pub const CRAFT_ROTATION_SPEED: f32 = 0.1;
    pub const CRAFT_THRUST: f32 = 0.1;
    pub const CRAFT_FRICTION: f32 = 0.98;
    pub const CRAFT_MAX_SPEED: f32 = 5.0;
    pub const FIRE_COOLDOWN_MS: f32 = 300.0;
    pub const RAPID_FIRE_COOLDOWN_MS: f32 = 100.0;
    pub const INVULNERABILITY_MS: f32 = 3000.0;

    /// Session defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_RESPAWNS: u32 = 1;
    pub const GAME_OVER_DELAY_MS: f64 = 500.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Lifespan counted in ticks, not milliseconds
    pub const PROJECTILE_LIFESPAN_TICKS: u32 = 50;

    /// Obstacle defaults
    pub const OBSTACLE_MIN_RADIUS: f32 = 30.0;
    pub const OBSTACLE_MAX_RADIUS: f32 = 50.0;
    pub const OBSTACLE_MIN_SPEED: f32 = 1.0;
    pub const OBSTACLE_MAX_SPEED: f32 = 3.0;
    pub const OBSTACLE_MIN_VERTICES: usize = 8;
    pub const OBSTACLE_MAX_VERTICES: usize = 12;
    /// Obstacles smaller than this vanish instead of splitting
    pub const SPLIT_THRESHOLD: f32 = 15.0;
    pub const SPLIT_RADIUS_FACTOR: f32 = 0.6;
    pub const SPLIT_SPEED_FACTOR: f32 = 1.2;
    pub const SPLIT_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    /// Fraction of the obstacle radius used for craft contact
    pub const CRAFT_HIT_FACTOR: f32 = 0.8;

    /// Spawn scheduling
    pub const INITIAL_OBSTACLES: usize = 4;
    pub const MAX_OBSTACLES: usize = 8;
    pub const OBSTACLE_INTERVAL_MS: f32 = 3000.0;
    pub const OBSTACLE_INTERVAL_FLOOR_MS: f32 = 1500.0;
    pub const OBSTACLE_INTERVAL_STEP_MS: f32 = 50.0;
    /// Half-extent of the spawn-free square around the viewport centre
    pub const SPAWN_EXCLUSION_HALF: f32 = 100.0;
    /// A new power-up appears on the first tick after the last one is gone
    pub const POWER_UP_INTERVAL_MS: f32 = 1.0;
    pub const MAX_POWER_UPS: usize = 1;

    /// Power-up defaults
    pub const POWER_UP_RADIUS: f32 = 10.0;
    pub const POWER_UP_LIFESPAN_MS: f32 = 5000.0;

    /// Background starfield
    pub const STAR_COUNT: usize = 100;
}

/// Unit vector a craft with facing `angle` points along (0 = up, y grows downward)
#[inline]
pub fn facing_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Points awarded for destroying an obstacle of the given radius
#[inline]
pub fn score_for_radius(radius: f32) -> u64 {
    (50.0 / radius * 10.0).floor() as u64
}
