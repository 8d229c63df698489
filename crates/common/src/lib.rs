//! Shared types for the viewscape crates: configuration, the host embedding
//! contract and small value types used across crate boundaries.

mod config;
mod surface;
mod types;

pub use config::{AssetPaths, CameraConfig, ConfigError, ViewportConfig};
pub use surface::{ApiVersion, ContextProfile, GraphicsApi, MIN_GL_CORE_VERSION, SurfaceRequest};
pub use types::{MoveDirection, SurfaceSize};

pub fn crate_info() -> &'static str {
    "viewscape-common v0.1.0"
}
