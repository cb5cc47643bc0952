//! Shape generation for 2D primitives
//!
//! All shapes are plain triangle lists in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Soft halo: a ring fading from `color` at the inner edge to transparent
pub fn glow_ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let clear = [color[0], color[1], color[2], 0.0];

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, clear));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, clear));
        vertices.push(Vertex::new(outer2.x, outer2.y, clear));
    }

    vertices
}

/// Axis-aligned filled rectangle; `top` and `bottom` colors give a vertical gradient
pub fn rect(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Rectangle outline drawn as four thin rects
pub fn rect_outline(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = thickness / 2.0;
    let max = min + size;
    let mut vertices = Vec::with_capacity(24);
    // Top, bottom
    vertices.extend(rect(
        Vec2::new(min.x - half, min.y - half),
        Vec2::new(size.x + thickness, thickness),
        color,
        color,
    ));
    vertices.extend(rect(
        Vec2::new(min.x - half, max.y - half),
        Vec2::new(size.x + thickness, thickness),
        color,
        color,
    ));
    // Left, right
    vertices.extend(rect(
        Vec2::new(min.x - half, min.y + half),
        Vec2::new(thickness, (size.y - thickness).max(0.0)),
        color,
        color,
    ));
    vertices.extend(rect(
        Vec2::new(max.x - half, min.y + half),
        Vec2::new(thickness, (size.y - thickness).max(0.0)),
        color,
        color,
    ));
    vertices
}

/// Vertical dashed line from `y = 0` to `height`
pub fn dashed_vline(x: f32, height: f32, dash: f32, gap: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let step = dash + gap;
    if step <= 0.0 {
        return vertices;
    }
    let mut y = 0.0;
    while y < height {
        let len = dash.min(height - y);
        vertices.extend(rect(
            Vec2::new(x - width / 2.0, y),
            Vec2::new(width, len),
            color,
            color,
        ));
        y += step;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for v in &verts {
            let d = Vec2::from(v.position) - Vec2::new(10.0, 10.0);
            assert!(d.length() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_rect_corners() {
        let verts = rect(Vec2::new(340.0, 560.0), Vec2::new(120.0, 12.0), [1.0; 4], [0.5; 4]);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 340.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 460.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 572.0);
    }

    #[test]
    fn test_dashed_line_pattern() {
        // 5px dash + 15px gap over 600px = 30 dashes
        let verts = dashed_vline(400.0, 600.0, 5.0, 15.0, 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 30 * 6);
        assert!(dashed_vline(400.0, 600.0, 0.0, 0.0, 2.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_glow_ring_fades_out() {
        let verts = glow_ring(Vec2::ZERO, 8.0, 16.0, [1.0, 1.0, 1.0, 0.6], 8);
        assert_eq!(verts.len(), 48);
        assert!(verts.iter().any(|v| v.color[3] == 0.0));
        assert!(verts.iter().any(|v| v.color[3] == 0.6));
    }
}
