//! Time-driven obstacle and power-up spawning with a one-way difficulty ramp

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::*;

/// Rejection-sampling attempts before giving up on the exclusion zone
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// What the scheduler wants spawned this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spawns {
    pub obstacle: bool,
    pub power_up: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Time since the last obstacle spawn (ms)
    pub obstacle_elapsed_ms: f32,
    /// Time since the last power-up spawn (ms)
    pub power_up_elapsed_ms: f32,
    /// Current obstacle threshold; only ever shrinks
    pub obstacle_interval_ms: f32,
    pub power_up_interval_ms: f32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self {
            obstacle_elapsed_ms: 0.0,
            power_up_elapsed_ms: 0.0,
            obstacle_interval_ms: OBSTACLE_INTERVAL_MS,
            power_up_interval_ms: POWER_UP_INTERVAL_MS,
        }
    }

    /// Zero both accumulators. The obstacle interval is left where the ramp put it.
    pub fn restart(&mut self) {
        self.obstacle_elapsed_ms = 0.0;
        self.power_up_elapsed_ms = 0.0;
    }

    /// Accumulate `dt_ms` and decide what to spawn given the live counts
    pub fn advance(&mut self, dt_ms: f32, obstacle_count: usize, power_up_count: usize) -> Spawns {
        let mut spawns = Spawns::default();

        self.obstacle_elapsed_ms += dt_ms;
        if self.obstacle_elapsed_ms > self.obstacle_interval_ms && obstacle_count < MAX_OBSTACLES {
            spawns.obstacle = true;
            self.obstacle_elapsed_ms = 0.0;
            self.obstacle_interval_ms = (self.obstacle_interval_ms - OBSTACLE_INTERVAL_STEP_MS)
                .max(OBSTACLE_INTERVAL_FLOOR_MS);
        }

        self.power_up_elapsed_ms += dt_ms;
        if self.power_up_elapsed_ms > self.power_up_interval_ms && power_up_count < MAX_POWER_UPS {
            spawns.power_up = true;
            self.power_up_elapsed_ms = 0.0;
        }

        spawns
    }
}

/// Uniform position anywhere in the viewport
pub fn sample_anywhere<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * viewport.width,
        rng.random::<f32>() * viewport.height,
    )
}

/// Uniform position outside the square exclusion zone around the centre
pub fn sample_outside_exclusion<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    let center = viewport.center();
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = sample_anywhere(viewport, rng);
        let d = (pos - center).abs();
        if d.x >= SPAWN_EXCLUSION_HALF || d.y >= SPAWN_EXCLUSION_HALF {
            return pos;
        }
    }
    // Viewport smaller than the exclusion zone: use a corner
    Vec2::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_spawn_after_threshold() {
        let mut s = SpawnScheduler::new();
        assert!(!s.advance(3000.0, 4, 1).obstacle);
        let spawns = s.advance(1.0, 4, 1);
        assert!(spawns.obstacle);
        assert_eq!(s.obstacle_elapsed_ms, 0.0);
        assert_eq!(s.obstacle_interval_ms, OBSTACLE_INTERVAL_MS - OBSTACLE_INTERVAL_STEP_MS);
    }

    #[test]
    fn test_obstacle_cap_blocks_spawn() {
        let mut s = SpawnScheduler::new();
        assert!(!s.advance(5000.0, MAX_OBSTACLES, 1).obstacle);
        // Accumulator keeps growing; spawn happens as soon as there is room
        assert!(s.advance(16.0, MAX_OBSTACLES - 1, 1).obstacle);
    }

    #[test]
    fn test_interval_ramps_down_to_floor() {
        let mut s = SpawnScheduler::new();
        for _ in 0..100 {
            s.advance(s.obstacle_interval_ms + 1.0, 0, 1);
        }
        assert_eq!(s.obstacle_interval_ms, OBSTACLE_INTERVAL_FLOOR_MS);

        // Restart does not undo the ramp
        s.restart();
        assert_eq!(s.obstacle_interval_ms, OBSTACLE_INTERVAL_FLOOR_MS);
        assert_eq!(s.obstacle_elapsed_ms, 0.0);
    }

    #[test]
    fn test_power_up_refills_on_next_frame() {
        let mut s = SpawnScheduler::new();
        // One 16 ms frame is enough
        assert!(s.advance(16.0, 0, 0).power_up);
        // Capped while one is live, however long it stays
        for _ in 0..100 {
            assert!(!s.advance(16.0, 0, MAX_POWER_UPS).power_up);
        }
        assert!(s.advance(16.0, 0, 0).power_up);
        assert_eq!(s.power_up_interval_ms, POWER_UP_INTERVAL_MS);
    }

    #[test]
    fn test_exclusion_zone_sampling() {
        let vp = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(77);
        let center = vp.center();
        for _ in 0..500 {
            let p = sample_outside_exclusion(&vp, &mut rng);
            let d = (p - center).abs();
            assert!(d.x >= SPAWN_EXCLUSION_HALF || d.y >= SPAWN_EXCLUSION_HALF);
            assert!(vp.contains(p, 0.0));
        }
    }

    #[test]
    fn test_tiny_viewport_falls_back() {
        let vp = Viewport::new(50.0, 50.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(sample_outside_exclusion(&vp, &mut rng), Vec2::ZERO);
    }
}
