//! Shape generation for 2D primitives
//!
//! Every function appends triangle-list vertices to `out`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

#[inline]
fn push(out: &mut Vec<Vertex>, p: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(p.x, p.y, color));
}

/// Single triangle
pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    push(out, a, color);
    push(out, b, color);
    push(out, c, color);
}

/// Axis-aligned rectangle with top-left corner `min`
pub fn quad(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    let max = min + size;
    let (tr, bl) = (Vec2::new(max.x, min.y), Vec2::new(min.x, max.y));
    triangle(out, min, tr, bl, color);
    triangle(out, bl, tr, max, color);
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        triangle(
            out,
            center,
            center + Vec2::from_angle(theta1) * radius,
            center + Vec2::from_angle(theta2) * radius,
            color,
        );
    }
}

/// Ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        triangle(out, inner1, outer1, inner2, color);
        triangle(out, inner2, outer1, outer2, color);
    }
}

/// Closed polygon around `center` as a triangle fan; `outline` holds offsets
pub fn polygon_fan(out: &mut Vec<Vertex>, center: Vec2, outline: &[Vec2], color: [f32; 4]) {
    if outline.len() < 3 {
        return;
    }
    out.reserve(outline.len() * 3);

    for (i, &a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        triangle(out, center, center + a, center + b, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);

        out.clear();
        ring(&mut out, Vec2::ZERO, 4.0, 5.0, [1.0; 4], 10);
        assert_eq!(out.len(), 60);

        out.clear();
        quad(&mut out, Vec2::ZERO, Vec2::ONE, [1.0; 4]);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_polygon_fan_closes() {
        let outline = [
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, -1.0),
        ];
        let mut out = Vec::new();
        polygon_fan(&mut out, Vec2::new(10.0, 10.0), &outline, [1.0; 4]);
        assert_eq!(out.len(), 12);
        // Last triangle wraps back to the first outline point
        assert_eq!(out[11].position, [11.0, 10.0]);

        out.clear();
        polygon_fan(&mut out, Vec2::ZERO, &outline[..2], [1.0; 4]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_circle_stays_on_radius() {
        let mut out = Vec::new();
        let c = Vec2::new(3.0, 4.0);
        circle(&mut out, c, 2.0, [1.0; 4], 8);
        for v in &out {
            let d = Vec2::from(v.position).distance(c);
            assert!(d < 1e-4 || (d - 2.0).abs() < 1e-4);
        }
    }
}
