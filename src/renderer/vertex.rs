//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an interleaved buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CRAFT: [f32; 4] = [1.0, 0.25, 0.5, 1.0]; // #ff4081
    pub const FLAME: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.55, 0.76, 0.29, 1.0]; // #8BC34A
    pub const RAPID_FIRE: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const SHIELD_PICKUP: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.7];

    /// Same colour with a new alpha
    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}
