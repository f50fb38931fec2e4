//! Tessellation of draw commands into an indexed triangle mesh.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::params::Color;
use crate::scene::DrawCommand;

/// Segments used to approximate a circle outline
pub const CIRCLE_SEGMENTS: usize = 64;

/// Vertex data for 2D strokes (pixel position + RGBA color)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Triangle mesh for one frame, in pixel coordinates (y down)
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub clear_color: Color,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the mesh from a frame's draw list, reusing allocations.
    pub fn build(&mut self, commands: &[DrawCommand]) {
        self.vertices.clear();
        self.indices.clear();

        for command in commands {
            match command {
                DrawCommand::Clear(color) => self.clear_color = *color,
                DrawCommand::CircleOutline {
                    center,
                    radius,
                    width,
                    color,
                } => self.push_ring(*center, *radius, *width, *color),
                DrawCommand::Line {
                    start,
                    end,
                    width,
                    color,
                } => self.push_segment(*start, *end, *width, *color),
                DrawCommand::Polyline {
                    points,
                    width,
                    color,
                } => {
                    for pair in points.windows(2) {
                        self.push_segment(pair[0], pair[1], *width, *color);
                    }
                }
            }
        }
    }

    /// Thick line as a quad. Zero-length and non-finite segments are skipped.
    fn push_segment(&mut self, start: Vec2, end: Vec2, width: f32, color: Color) {
        let direction = end - start;
        let length = direction.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return;
        }

        let normal = direction.perp() / length * (width / 2.0);
        let base = self.vertices.len() as u32;
        for position in [start + normal, start - normal, end - normal, end + normal] {
            self.vertices.push(Vertex {
                position: position.to_array(),
                color,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Circle outline as a ring of quads between inner and outer radius.
    fn push_ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
            return;
        }

        let inner = (radius - width / 2.0).max(0.0);
        let outer = radius + width / 2.0;
        let base = self.vertices.len() as u32;

        for i in 0..CIRCLE_SEGMENTS {
            let theta = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let direction = Vec2::from_angle(theta);
            self.vertices.push(Vertex {
                position: (center + direction * inner).to_array(),
                color,
            });
            self.vertices.push(Vertex {
                position: (center + direction * outer).to_array(),
                color,
            });
        }

        for i in 0..CIRCLE_SEGMENTS as u32 {
            let next = (i + 1) % CIRCLE_SEGMENTS as u32;
            let (inner_a, outer_a) = (base + 2 * i, base + 2 * i + 1);
            let (inner_b, outer_b) = (base + 2 * next, base + 2 * next + 1);
            self.indices
                .extend_from_slice(&[inner_a, outer_a, outer_b, inner_a, outer_b, inner_b]);
        }
    }
}
