//! Host drawing surface: turns the render loop's draw list into triangles
//! and presents them with wgpu.

mod mesh;
mod system;

pub use mesh::{Mesh, Vertex, CIRCLE_SEGMENTS};
pub use system::{RenderSystem, Uniforms};
