//! Obstacles: jagged drifting rocks that split when shot

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityIds, Viewport};
use crate::consts::*;

/// A fragmenting hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Unit direction of travel; never changed by speed rescaling
    pub heading: Vec2,
    /// Speed before the global multiplier is applied
    pub base_speed: f32,
    /// Outline offsets from `pos`, generated once at creation
    pub silhouette: Vec<Vec2>,
}

impl Obstacle {
    /// Build an obstacle travelling along `heading_angle` (radians)
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        pos: Vec2,
        radius: f32,
        base_speed: f32,
        heading_angle: f32,
        multiplier: f32,
        rng: &mut R,
    ) -> Self {
        let heading = Vec2::from_angle(heading_angle);
        Self {
            id,
            pos,
            vel: heading * base_speed * multiplier,
            radius,
            heading,
            base_speed,
            silhouette: jagged_silhouette(radius, rng),
        }
    }

    /// Full-size obstacle with random size, speed and heading
    pub fn random<R: Rng + ?Sized>(id: u32, pos: Vec2, multiplier: f32, rng: &mut R) -> Self {
        let radius = rng.random_range(OBSTACLE_MIN_RADIUS..OBSTACLE_MAX_RADIUS);
        let base_speed = rng.random_range(OBSTACLE_MIN_SPEED..OBSTACLE_MAX_SPEED);
        let heading_angle = rng.random::<f32>() * std::f32::consts::TAU;
        Self::new(id, pos, radius, base_speed, heading_angle, multiplier, rng)
    }

    /// Current speed in units per tick
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Move and wrap, using the radius as margin so the rock slides fully off-screen first
    pub fn update(&mut self, viewport: &Viewport) {
        self.pos = viewport.wrap_with_margin(self.pos + self.vel, self.radius);
    }

    pub fn can_split(&self) -> bool {
        self.radius >= SPLIT_THRESHOLD
    }

    /// Break into two smaller, faster rocks veering ±45° off the parent's course.
    ///
    /// Returns nothing for rocks under the split threshold. Children get new
    /// IDs and freshly generated silhouettes.
    pub fn split<R: Rng + ?Sized>(
        &self,
        ids: &mut EntityIds,
        rng: &mut R,
        multiplier: f32,
    ) -> Vec<Obstacle> {
        if !self.can_split() {
            return Vec::new();
        }

        let radius = self.radius * SPLIT_RADIUS_FACTOR;
        // Parent's current speed, scaled once more by the multiplier
        let base_speed = self.base_speed * SPLIT_SPEED_FACTOR * multiplier;
        let course = self.heading.to_angle();

        [SPLIT_ANGLE, -SPLIT_ANGLE]
            .into_iter()
            .map(|offset| {
                Obstacle::new(
                    ids.next_id(),
                    self.pos,
                    radius,
                    base_speed,
                    course + offset,
                    multiplier,
                    rng,
                )
            })
            .collect()
    }

    /// Rescale velocity for a new global multiplier, keeping the heading
    pub fn apply_speed_multiplier(&mut self, multiplier: f32) {
        self.vel = self.heading * self.base_speed * multiplier;
    }
}

/// Random polygon outline: 8-12 vertices evenly spaced in angle, each at
/// 50-100% of the radius
fn jagged_silhouette<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec<Vec2> {
    let count = rng.random_range(OBSTACLE_MIN_VERTICES..=OBSTACLE_MAX_VERTICES);
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
            let variation = rng.random_range(0.5..1.0);
            Vec2::from_angle(angle) * radius * variation
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rock(radius: f32, heading_angle: f32) -> Obstacle {
        let mut rng = Pcg32::seed_from_u64(1);
        Obstacle::new(1, Vec2::new(400.0, 300.0), radius, 2.0, heading_angle, 1.0, &mut rng)
    }

    #[test]
    fn test_silhouette_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let o = Obstacle::random(1, Vec2::ZERO, 1.0, &mut rng);
            assert!((OBSTACLE_MIN_VERTICES..=OBSTACLE_MAX_VERTICES).contains(&o.silhouette.len()));
            for v in &o.silhouette {
                let r = v.length();
                assert!(r >= o.radius * 0.5 - 1e-3 && r <= o.radius + 1e-3);
            }
            assert!(o.radius >= OBSTACLE_MIN_RADIUS && o.radius < OBSTACLE_MAX_RADIUS);
        }
    }

    #[test]
    fn test_split_produces_two_smaller_faster_children() {
        let parent = rock(30.0, 0.0);
        let mut ids = EntityIds::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let children = parent.split(&mut ids, &mut rng, 1.0);

        assert_eq!(children.len(), 2);
        for child in &children {
            assert!((child.radius - 18.0).abs() < 1e-4);
            assert!((child.speed() - parent.speed() * 1.2).abs() < 1e-4);
            assert_eq!(child.pos, parent.pos);
            assert_ne!(child.id, parent.id);
        }
        let a = children[0].heading.to_angle();
        let b = children[1].heading.to_angle();
        assert!((a - SPLIT_ANGLE).abs() < 1e-4);
        assert!((b + SPLIT_ANGLE).abs() < 1e-4);
        assert_ne!(children[0].id, children[1].id);
    }

    #[test]
    fn test_small_obstacle_does_not_split() {
        let parent = rock(14.9, 1.0);
        let mut ids = EntityIds::default();
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(parent.split(&mut ids, &mut rng, 1.0).is_empty());
        // Exactly at the threshold still splits
        assert_eq!(rock(15.0, 1.0).split(&mut ids, &mut rng, 1.0).len(), 2);
    }

    #[test]
    fn test_speed_multiplier_keeps_heading() {
        let mut o = rock(40.0, 1.2);
        let heading = o.heading;
        o.apply_speed_multiplier(2.0);
        assert!((o.speed() - 4.0).abs() < 1e-4);
        assert_eq!(o.heading, heading);
        assert!(o.vel.normalize().abs_diff_eq(heading, 1e-5));
        o.apply_speed_multiplier(0.5);
        assert!((o.speed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_split_scales_parent_speed_by_multiplier() {
        let mut parent = rock(40.0, 0.0);
        parent.apply_speed_multiplier(2.0);
        assert!((parent.speed() - 4.0).abs() < 1e-4);

        let mut ids = EntityIds::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let children = parent.split(&mut ids, &mut rng, 2.0);
        assert_eq!(children.len(), 2);
        for child in children {
            assert!((child.speed() - 4.0 * 1.2 * 2.0).abs() < 1e-4);
        }
    }

    proptest! {
        #[test]
        fn prop_wrap_stays_within_margin(
            x in -60.0f32..860.0,
            y in -60.0f32..660.0,
            angle in 0.0f32..std::f32::consts::TAU,
            radius in 5.0f32..50.0,
        ) {
            let vp = Viewport::new(800.0, 600.0);
            let mut rng = Pcg32::seed_from_u64(3);
            let start = vp.wrap_with_margin(Vec2::new(x, y), radius);
            let mut o = Obstacle::new(1, start, radius, 3.0, angle, 1.5, &mut rng);
            for _ in 0..400 {
                o.update(&vp);
                prop_assert!(vp.contains(o.pos, o.radius));
            }
        }
    }
}
