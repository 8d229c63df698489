//! Rendering adapter: backend-agnostic pieces of the viewport renderer.
//!
//! # Invariants
//! - Backends never touch camera state; they receive finished matrices.
//! - GPU handles exist only between `initialize` and `release`.
//!
//! The [`RenderBackend`] trait is the seam between the viewport state machine
//! and a GPU API. [`DebugTextBackend`] implements it without a GPU so the
//! viewport can run headless.

mod assets;
mod backend;
mod debug;
mod image_data;
mod mesh;
mod uniforms;

pub use assets::SceneAssets;
pub use backend::{FrameParams, FrameStatus, RenderBackend, RenderError, ShaderStage};
pub use debug::DebugTextBackend;
pub use image_data::ImageData;
pub use mesh::{Mesh, TEXTURED_VERTEX_LAYOUT, TexturedVertex, VertexAttribute, VertexLayout};
pub use uniforms::{UniformBlock, UniformSlot};

pub fn crate_info() -> &'static str {
    "viewscape-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
