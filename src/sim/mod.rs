//! Simulation module
//!
//! All gameplay logic lives here:
//! - Entities own their per-tick update rules
//! - The world is the single owner of every entity
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod craft;
pub mod entities;
pub mod obstacle;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve, within_reach};
pub use craft::{ActivePowerUp, Craft, HitOutcome, Shot};
pub use entities::{BackgroundParticle, PowerUp, PowerUpKind, Projectile};
pub use obstacle::Obstacle;
pub use spawn::{SpawnScheduler, Spawns};
pub use state::{EntityIds, GameEvent, Session, SoundCue, Viewport, World};
pub use tick::{Intent, tick};
