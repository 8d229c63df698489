use glam::Mat4;
use std::fmt;
use std::path::PathBuf;
use viewscape_common::{ConfigError, SurfaceSize};

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors from render backends.
///
/// Everything except [`RenderError::Surface`] is raised during initialization
/// and is fatal to the viewport.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("failed to read shader source {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader compilation failed: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },
    #[error("shader program link failed: {0}")]
    ProgramLink(String),
    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),
    #[error("uniform `{name}` is not a {expected}")]
    UniformType { name: String, expected: &'static str },
    #[error("unsupported surface request: {0}")]
    UnsupportedSurface(String),
    #[error("GPU device unavailable: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("backend used before initialization")]
    NotInitialized,
}

/// What happened to a frame the backend was asked to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// Nothing reached the screen, e.g. the surface was lost and reconfigured.
    Skipped,
}

/// Per-frame inputs handed from the viewport to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub frame_index: u64,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub texture_mix: f32,
}

/// A GPU (or GPU stand-in) the viewport renders through.
///
/// All calls happen on the thread that owns the surface.
pub trait RenderBackend {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// One-time setup: buffers, shader program, textures.
    fn initialize(&mut self, size: SurfaceSize) -> Result<(), RenderError>;

    /// Resize the drawable. `size` is already clamped to at least 1x1.
    fn resize(&mut self, size: SurfaceSize);

    /// Clear, bind, draw and present one frame.
    fn draw_frame(&mut self, frame: &FrameParams) -> Result<FrameStatus, RenderError>;

    /// Release every GPU handle. Must be safe before or without `initialize`.
    fn release(&mut self);
}
