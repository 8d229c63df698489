//! wgpu render backend for the viewport.
//!
//! Draws a textured quad (two blended texture units) with optional depth
//! testing into a winit window surface.
//!
//! # Invariants
//! - Every GPU handle lives in one state struct created by `initialize` and
//!   dropped by `release`; nothing is valid before or after.
//! - Shader compile and pipeline link errors are captured through wgpu
//!   error scopes and returned, never deferred to the first frame.
//! - Only the event loop thread touches the surface and device.

mod gpu;
mod shader;
mod texture;

pub use gpu::{WgpuBackend, backends_for, check_request};
pub use shader::{ProgramDesc, ShaderProgram};
pub use texture::Texture;
