//! Small entities: projectiles, power-ups and the background starfield

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::*;

/// A shot fired by the craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining ticks; decremented once per update regardless of frame time
    pub lifespan: u32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            lifespan: PROJECTILE_LIFESPAN_TICKS,
        }
    }

    pub fn update(&mut self, viewport: &Viewport) {
        self.pos = viewport.wrap(self.pos + self.vel);
        self.lifespan = self.lifespan.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.lifespan == 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Fire cooldown drops to 100 ms
    RapidFire,
    /// Craft ignores obstacle contact
    Shield,
}

impl PowerUpKind {
    /// Short label drawn on the pickup
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "RF",
            PowerUpKind::Shield => "S",
        }
    }
}

/// A static, time-limited pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    pub lifespan_ms: f32,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            radius: POWER_UP_RADIUS,
            kind,
            lifespan_ms: POWER_UP_LIFESPAN_MS,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.lifespan_ms -= dt_ms;
    }

    pub fn is_expired(&self) -> bool {
        self.lifespan_ms <= 0.0
    }
}

/// A twinkling background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
    /// Angular speed of the twinkle (radians per ms)
    pub twinkle_speed: f32,
    pub phase: f32,
}

impl BackgroundParticle {
    pub fn random<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 0.1,
                (rng.random::<f32>() - 0.5) * 0.1,
            ),
            size: rng.random_range(1.0..3.0),
            opacity: rng.random_range(0.5..1.0),
            twinkle_speed: rng.random_range(0.01..0.03),
            phase: rng.random::<f32>() * std::f32::consts::TAU,
        }
    }

    /// Drift and twinkle; opacity follows wall-clock time
    pub fn update(&mut self, now_ms: f64, viewport: &Viewport) {
        let t = (now_ms * self.twinkle_speed as f64) as f32 + self.phase;
        self.opacity = 0.5 + 0.5 * t.sin();
        self.pos = viewport.wrap(self.pos + self.vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_projectile_lifespan_counts_ticks() {
        let vp = Viewport::default();
        let mut p = Projectile::new(1, Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0));
        for _ in 0..PROJECTILE_LIFESPAN_TICKS - 1 {
            p.update(&vp);
            assert!(!p.is_expired());
        }
        p.update(&vp);
        assert!(p.is_expired());
    }

    #[test]
    fn test_projectile_wraps_without_margin() {
        let vp = Viewport::new(800.0, 600.0);
        let mut p = Projectile::new(1, Vec2::new(795.0, 300.0), Vec2::new(10.0, 0.0));
        p.update(&vp);
        assert_eq!(p.pos.x, 0.0);
    }

    #[test]
    fn test_power_up_expires_by_elapsed_time() {
        let mut p = PowerUp::new(1, Vec2::ZERO, PowerUpKind::Shield);
        p.update(4999.0);
        assert!(!p.is_expired());
        p.update(1.0);
        assert!(p.is_expired());
        // Static
        assert_eq!(p.pos, Vec2::ZERO);
    }

    #[test]
    fn test_particle_opacity_in_range() {
        let vp = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut star = BackgroundParticle::random(&vp, &mut rng);
        for i in 0..200 {
            star.update(i as f64 * 16.7, &vp);
            assert!((0.0..=1.0).contains(&star.opacity));
            assert!(vp.contains(star.pos, 0.0));
        }
    }

    proptest! {
        #[test]
        fn prop_projectile_stays_on_screen(
            x in 0.0f32..=800.0,
            y in 0.0f32..=600.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let vp = Viewport::new(800.0, 600.0);
            let vel = Vec2::from_angle(angle) * PROJECTILE_SPEED;
            let mut p = Projectile::new(1, Vec2::new(x, y), vel);
            while !p.is_expired() {
                p.update(&vp);
                prop_assert!(vp.contains(p.pos, 0.0));
            }
        }
    }
}
