//! The player-controlled craft

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::PowerUpKind;
use super::state::{GameEvent, Session, SoundCue, Viewport};
use super::tick::Intent;
use crate::consts::*;
use crate::facing_vector;

/// Power-up currently held by the craft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// `None` means held until replaced or the session ends
    pub remaining_ms: Option<f32>,
}

/// Result of a `Craft::hit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable, shielded, or already destroyed
    Ignored,
    /// Lost a life and was re-centred
    Respawned,
    /// Lost the last life or respawn; game over follows
    Destroyed,
}

/// A projectile request produced by the craft's trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing in radians, 0 = up
    pub angle: f32,
    pub radius: f32,
    pub rotation_speed: f32,
    pub thrust: f32,
    /// Multiplicative velocity decay per tick
    pub friction: f32,
    pub max_speed: f32,
    pub fire_cooldown_ms: f32,
    pub invulnerable: bool,
    pub invulnerable_ms: f32,
    pub power_up: Option<ActivePowerUp>,
}

impl Craft {
    pub fn new(pos: Vec2, thrust: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: CRAFT_RADIUS,
            rotation_speed: CRAFT_ROTATION_SPEED,
            thrust,
            friction: CRAFT_FRICTION,
            max_speed: CRAFT_MAX_SPEED,
            fire_cooldown_ms: 0.0,
            invulnerable: false,
            invulnerable_ms: 0.0,
            power_up: None,
        }
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_up.is_some_and(|p| p.kind == kind)
    }

    /// Invulnerable or shielded: obstacle contact does nothing
    pub fn is_protected(&self) -> bool {
        self.invulnerable || self.has_power_up(PowerUpKind::Shield)
    }

    /// Point the craft fires from
    pub fn nose(&self) -> Vec2 {
        self.pos + facing_vector(self.angle) * self.radius
    }

    /// Advance one tick: steer, thrust, damp, clamp speed, move, wrap, fire, age timers.
    ///
    /// Returns the shot fired this tick, if any.
    pub fn update(
        &mut self,
        intent: &Intent,
        dt_ms: f32,
        viewport: &Viewport,
        events: &mut Vec<GameEvent>,
    ) -> Option<Shot> {
        if intent.left {
            self.angle -= self.rotation_speed;
        }
        if intent.right {
            self.angle += self.rotation_speed;
        }

        let forward = facing_vector(self.angle);
        if intent.thrust {
            self.vel += forward * self.thrust;
        }
        if intent.reverse {
            self.vel -= forward * self.thrust;
        }

        self.vel *= self.friction;

        // Rescale the whole vector so direction is preserved
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }

        self.pos = viewport.wrap(self.pos + self.vel);

        if self.fire_cooldown_ms > 0.0 {
            self.fire_cooldown_ms -= dt_ms;
        }

        let mut shot = None;
        if intent.fire && self.fire_cooldown_ms <= 0.0 {
            shot = Some(Shot {
                origin: self.nose(),
                velocity: forward * PROJECTILE_SPEED,
            });
            self.fire_cooldown_ms = if self.has_power_up(PowerUpKind::RapidFire) {
                RAPID_FIRE_COOLDOWN_MS
            } else {
                FIRE_COOLDOWN_MS
            };
            events.push(GameEvent::Sound(SoundCue::Shoot));
        }

        if self.invulnerable {
            self.invulnerable_ms -= dt_ms;
            if self.invulnerable_ms <= 0.0 {
                self.invulnerable = false;
                self.invulnerable_ms = 0.0;
            }
        }

        let power_up_expired = match &mut self.power_up {
            Some(ActivePowerUp {
                remaining_ms: Some(remaining),
                ..
            }) => {
                *remaining -= dt_ms;
                *remaining <= 0.0
            }
            _ => false,
        };
        if power_up_expired {
            self.power_up = None;
        }

        shot
    }

    /// Take an obstacle hit.
    ///
    /// Ignored while protected or once the game-over is already pending.
    /// Otherwise costs a life; with lives or respawns exhausted the craft is
    /// destroyed, else it is re-centred and made invulnerable.
    pub fn hit(
        &mut self,
        session: &mut Session,
        viewport: &Viewport,
        events: &mut Vec<GameEvent>,
    ) -> HitOutcome {
        if self.is_protected() || session.game_over_pending {
            return HitOutcome::Ignored;
        }

        session.lives = session.lives.saturating_sub(1);
        events.push(GameEvent::LivesChanged(session.lives));
        events.push(GameEvent::Sound(SoundCue::Explosion));

        if session.lives == 0 || session.respawn_count >= session.max_respawns {
            session.game_over_pending = true;
            events.push(GameEvent::CraftDestroyed);
            return HitOutcome::Destroyed;
        }

        session.respawn_count += 1;
        self.invulnerable = true;
        self.invulnerable_ms = INVULNERABILITY_MS;
        self.pos = viewport.center();
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        events.push(GameEvent::CraftRespawned);
        HitOutcome::Respawned
    }

    /// Replace the held power-up with `kind`, held until the next pickup
    pub fn collect_power_up(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        self.power_up = Some(ActivePowerUp {
            kind,
            remaining_ms: None,
        });
        log::debug!("Power-up collected: {:?}", kind);
        events.push(GameEvent::Sound(SoundCue::PowerUp));
        events.push(GameEvent::PowerUpCollected(kind));
    }
}
