//! Rendering module
//!
//! The game loop hands a `FrameView` to a `RenderConsumer` after every state
//! change. `MeshRenderer` turns the view into a flat list of coloured
//! triangles that any backend (canvas, GPU buffer) can draw.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::game::LoopPhase;
use crate::sim::{Intent, PowerUpKind, World};

/// Blink period of an invulnerable craft (ms)
const BLINK_MS: f64 = 100.0;

/// Full-screen message drawn over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    StartPrompt,
    Paused,
    GameOver { score: u64 },
}

impl Overlay {
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Overlay::None => None,
            Overlay::StartPrompt => Some("Press Start to Play"),
            Overlay::Paused => Some("PAUSED"),
            Overlay::GameOver { .. } => Some("GAME OVER"),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub world: &'a World,
    pub phase: LoopPhase,
    /// Drives the thrust flames
    pub intent: Intent,
    pub show_craft: bool,
    pub overlay: Overlay,
    /// `(respawns used, respawns allowed)` once the craft has respawned
    pub respawns: Option<(u32, u32)>,
}

impl<'a> FrameView<'a> {
    /// `final_score` is set once a session has ended and no new one started
    pub fn new(
        world: &'a World,
        phase: LoopPhase,
        intent: Intent,
        now_ms: f64,
        final_score: Option<u64>,
    ) -> Self {
        let session = &world.session;
        let blinked_out =
            world.craft.invulnerable && (now_ms / BLINK_MS).floor().rem_euclid(2.0) == 0.0;
        let show_craft = matches!(phase, LoopPhase::Running | LoopPhase::Paused)
            && session.lives > 0
            && !blinked_out;

        let overlay = match (phase, final_score) {
            (LoopPhase::Running, _) => Overlay::None,
            (LoopPhase::Paused, _) => Overlay::Paused,
            (LoopPhase::Idle, Some(score)) => Overlay::GameOver { score },
            (LoopPhase::Idle, None) => Overlay::StartPrompt,
        };

        let respawns = (session.respawn_count > 0)
            .then_some((session.respawn_count, session.max_respawns));

        Self {
            world,
            phase,
            intent,
            show_craft,
            overlay,
            respawns,
        }
    }

    pub fn respawn_label(&self) -> Option<String> {
        self.respawns
            .map(|(used, max)| format!("Respawns: {}/{}", used, max))
    }
}

/// Receives a view after every state change
pub trait RenderConsumer {
    fn render(&mut self, view: &FrameView);
}

/// Tessellated frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
    pub overlay: Option<Overlay>,
    pub respawn_label: Option<String>,
}

impl Frame {
    /// Raw interleaved vertex data for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Turns a `FrameView` into triangles, reusing one buffer between frames
#[derive(Debug, Default)]
pub struct MeshRenderer {
    frame: Frame,
    frames_rendered: u64,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn tessellate(out: &mut Vec<Vertex>, view: &FrameView) {
        let world = view.world;
        let size = Vec2::new(world.viewport.width, world.viewport.height);

        shapes::quad(out, Vec2::ZERO, size, colors::BACKGROUND);

        for star in &world.particles {
            shapes::quad(
                out,
                star.pos,
                Vec2::splat(star.size),
                colors::with_alpha(colors::STAR, star.opacity),
            );
        }

        for obstacle in &world.obstacles {
            shapes::polygon_fan(out, obstacle.pos, &obstacle.silhouette, colors::OBSTACLE);
        }

        for projectile in &world.projectiles {
            shapes::circle(out, projectile.pos, projectile.radius, colors::PROJECTILE, 8);
        }

        for power_up in &world.power_ups {
            let color = match power_up.kind {
                PowerUpKind::RapidFire => colors::RAPID_FIRE,
                PowerUpKind::Shield => colors::SHIELD_PICKUP,
            };
            shapes::circle(out, power_up.pos, power_up.radius, color, 16);
        }

        if view.show_craft {
            Self::craft(out, view);
        }

        if view.overlay != Overlay::None {
            shapes::quad(out, Vec2::ZERO, size, colors::OVERLAY);
        }
    }

    /// Nose-up triangle rotated by the craft angle, with flames and shield
    fn craft(out: &mut Vec<Vertex>, view: &FrameView) {
        let craft = &view.world.craft;
        let r = craft.radius;
        let rot = Vec2::from_angle(craft.angle);
        let at = |x: f32, y: f32| craft.pos + rot.rotate(Vec2::new(x, y));

        shapes::triangle(out, at(0.0, -r), at(-r / 2.0, r), at(r / 2.0, r), colors::CRAFT);

        if view.intent.thrust {
            shapes::triangle(out, at(-r / 3.0, r), at(0.0, r * 1.5), at(r / 3.0, r), colors::FLAME);
        }
        if view.intent.reverse {
            shapes::triangle(
                out,
                at(-r / 3.0, -r),
                at(0.0, -r * 1.5),
                at(r / 3.0, -r),
                colors::FLAME,
            );
        }
        if craft.has_power_up(PowerUpKind::Shield) {
            shapes::ring(out, craft.pos, r + 4.0, r + 6.0, colors::SHIELD, 24);
        }
    }
}

impl RenderConsumer for MeshRenderer {
    fn render(&mut self, view: &FrameView) {
        self.frame.vertices.clear();
        Self::tessellate(&mut self.frame.vertices, view);
        self.frame.overlay = (view.overlay != Overlay::None).then_some(view.overlay);
        self.frame.respawn_label = view.respawn_label();
        self.frames_rendered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Viewport;

    fn world() -> World {
        World::new(Viewport::default(), 9, 0)
    }

    #[test]
    fn test_overlay_per_phase() {
        let w = world();
        let view = |phase, score| FrameView::new(&w, phase, Intent::default(), 0.0, score);
        assert_eq!(view(LoopPhase::Idle, None).overlay, Overlay::StartPrompt);
        assert_eq!(
            view(LoopPhase::Idle, Some(42)).overlay,
            Overlay::GameOver { score: 42 }
        );
        assert_eq!(view(LoopPhase::Paused, None).overlay, Overlay::Paused);
        assert_eq!(view(LoopPhase::Running, Some(42)).overlay, Overlay::None);
    }

    #[test]
    fn test_craft_visibility() {
        let mut w = world();
        let shown = |w: &World, phase, now| {
            FrameView::new(w, phase, Intent::default(), now, None).show_craft
        };
        assert!(!shown(&w, LoopPhase::Idle, 0.0));
        assert!(shown(&w, LoopPhase::Running, 0.0));
        assert!(shown(&w, LoopPhase::Paused, 0.0));

        w.craft.invulnerable = true;
        // Hidden on even 100 ms buckets, shown on odd ones
        assert!(!shown(&w, LoopPhase::Running, 50.0));
        assert!(shown(&w, LoopPhase::Running, 150.0));

        w.craft.invulnerable = false;
        w.session.lives = 0;
        assert!(!shown(&w, LoopPhase::Running, 150.0));
    }

    #[test]
    fn test_respawn_indicator() {
        let mut w = world();
        let view = FrameView::new(&w, LoopPhase::Running, Intent::default(), 0.0, None);
        assert_eq!(view.respawn_label(), None);
        w.session.respawn_count = 1;
        let view = FrameView::new(&w, LoopPhase::Running, Intent::default(), 0.0, None);
        assert_eq!(view.respawn_label().as_deref(), Some("Respawns: 1/1"));
    }

    #[test]
    fn test_mesh_renderer_output() {
        let w = world();
        let mut renderer = MeshRenderer::new();

        renderer.render(&FrameView::new(&w, LoopPhase::Idle, Intent::default(), 0.0, None));
        let idle = renderer.frame().vertices.len();
        assert_eq!(renderer.frame().overlay, Some(Overlay::StartPrompt));

        let thrust = Intent { thrust: true, ..Default::default() };
        renderer.render(&FrameView::new(&w, LoopPhase::Running, thrust, 0.0, None));
        let running = renderer.frame().vertices.len();
        // Craft and flame (6 vertices) replace the overlay quad (6)
        assert_eq!(running, idle);
        assert_eq!(renderer.frame().overlay, None);
        assert_eq!(renderer.frame().as_bytes().len(), running * Vertex::STRIDE);
        assert_eq!(renderer.frames_rendered(), 2);
    }
}
