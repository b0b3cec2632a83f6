//! Keyboard and touch mapping onto the per-tick `Intent`

use glam::Vec2;

use crate::sim::{Intent, Viewport};

/// One boolean channel of the intent vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Thrust,
    Reverse,
    Fire,
}

impl Intent {
    /// Set a single channel
    pub fn set(&mut self, control: Control, active: bool) {
        match control {
            Control::Left => self.left = active,
            Control::Right => self.right = active,
            Control::Thrust => self.thrust = active,
            Control::Reverse => self.reverse = active,
            Control::Fire => self.fire = active,
        }
    }
}

/// Arrow keys, WASD and space. Key names follow `KeyboardEvent.key`.
pub fn control_for_key(key: &str) -> Option<Control> {
    match key {
        "ArrowLeft" | "a" => Some(Control::Left),
        "ArrowRight" | "d" => Some(Control::Right),
        "ArrowUp" | "w" => Some(Control::Thrust),
        "ArrowDown" | "s" => Some(Control::Reverse),
        " " => Some(Control::Fire),
        _ => None,
    }
}

/// Whether the browser's default action for `key` (scrolling) should be suppressed
pub fn is_game_key(key: &str) -> bool {
    matches!(key, "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " ")
}

/// Axis-aligned screen rectangle, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub min: Vec2,
    pub max: Vec2,
}

impl Zone {
    fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// On-screen touch regions; the outer quarters steer, the centre thrusts and fires
#[derive(Debug, Clone, PartialEq)]
pub struct TouchZones {
    zones: [(Control, Zone); 5],
}

impl TouchZones {
    pub fn new(viewport: &Viewport) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        Self {
            zones: [
                (Control::Left, Zone::new(0.0, 0.0, w / 4.0, h)),
                (Control::Right, Zone::new(w * 3.0 / 4.0, 0.0, w / 4.0, h)),
                (Control::Thrust, Zone::new(w / 4.0, 0.0, w / 2.0, h / 2.0)),
                (Control::Reverse, Zone::new(w / 4.0, h / 2.0, w / 4.0, h / 2.0)),
                (Control::Fire, Zone::new(w / 2.0, h / 2.0, w / 4.0, h / 2.0)),
            ],
        }
    }

    /// Every control whose zone contains `point` (zones share edges)
    pub fn controls_at(&self, point: Vec2) -> impl Iterator<Item = Control> + '_ {
        self.zones
            .iter()
            .filter(move |(_, zone)| zone.contains(point))
            .map(|(control, _)| *control)
    }

    /// Touch start: switch on every control under any active touch
    pub fn press(&self, intent: &mut Intent, touches: &[Vec2]) {
        for &touch in touches {
            for control in self.controls_at(touch) {
                intent.set(control, true);
            }
        }
    }

    /// Touch end or cancel: release everything
    pub fn release(&self, intent: &mut Intent) {
        intent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(control_for_key("ArrowLeft"), Some(Control::Left));
        assert_eq!(control_for_key("a"), Some(Control::Left));
        assert_eq!(control_for_key("d"), Some(Control::Right));
        assert_eq!(control_for_key("w"), Some(Control::Thrust));
        assert_eq!(control_for_key("ArrowDown"), Some(Control::Reverse));
        assert_eq!(control_for_key(" "), Some(Control::Fire));
        assert_eq!(control_for_key("q"), None);
        assert!(is_game_key(" "));
        assert!(!is_game_key("a"));
    }

    #[test]
    fn test_intent_set() {
        let mut intent = Intent::default();
        intent.set(Control::Fire, true);
        intent.set(Control::Thrust, true);
        assert!(intent.fire && intent.thrust);
        intent.set(Control::Fire, false);
        assert!(!intent.fire);
    }

    #[test]
    fn test_touch_zones() {
        let zones = TouchZones::new(&Viewport::new(800.0, 600.0));
        let at = |x: f32, y: f32| zones.controls_at(Vec2::new(x, y)).collect::<Vec<_>>();

        assert_eq!(at(50.0, 300.0), vec![Control::Left]);
        assert_eq!(at(750.0, 300.0), vec![Control::Right]);
        assert_eq!(at(400.0, 100.0), vec![Control::Thrust]);
        assert_eq!(at(300.0, 500.0), vec![Control::Reverse]);
        assert_eq!(at(500.0, 500.0), vec![Control::Fire]);
    }

    #[test]
    fn test_touch_press_and_release() {
        let zones = TouchZones::new(&Viewport::new(800.0, 600.0));
        let mut intent = Intent::default();
        zones.press(&mut intent, &[Vec2::new(50.0, 300.0), Vec2::new(500.0, 500.0)]);
        assert!(intent.left && intent.fire);
        assert!(!intent.right);
        zones.release(&mut intent);
        assert_eq!(intent, Intent::default());
    }
}
