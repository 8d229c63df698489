//! Host embedding contract: which graphics API, version and profile the
//! viewport asks its host container for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Graphics API the rendering surface should be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    OpenGl,
    Vulkan,
    Metal,
    Dx12,
    /// Let the platform pick the best available backend.
    #[default]
    Any,
}

impl fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphicsApi::OpenGl => "opengl",
            GraphicsApi::Vulkan => "vulkan",
            GraphicsApi::Metal => "metal",
            GraphicsApi::Dx12 => "dx12",
            GraphicsApi::Any => "any",
        };
        f.write_str(name)
    }
}

/// Context profile. Only meaningful for OpenGL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextProfile {
    #[default]
    Core,
    Compatibility,
}

/// `major.minor` API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiVersion {
    pub major: u8,
    pub minor: u8,
}

impl ApiVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Lowest OpenGL core version the GL backend can drive.
pub const MIN_GL_CORE_VERSION: ApiVersion = ApiVersion::new(3, 3);

/// Surface creation request handed to the host container at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceRequest {
    pub api: GraphicsApi,
    pub min_version: ApiVersion,
    pub profile: ContextProfile,
}

impl Default for SurfaceRequest {
    fn default() -> Self {
        Self {
            api: GraphicsApi::Any,
            min_version: MIN_GL_CORE_VERSION,
            profile: ContextProfile::Core,
        }
    }
}

impl SurfaceRequest {
    /// Check the request is internally consistent.
    ///
    /// Returns a human readable reason on rejection.
    pub fn check(&self) -> Result<(), String> {
        if self.profile == ContextProfile::Compatibility && self.api != GraphicsApi::OpenGl {
            return Err(format!(
                "compatibility profile requires the opengl api, got {}",
                self.api
            ));
        }
        if self.api == GraphicsApi::OpenGl
            && self.profile == ContextProfile::Core
            && self.min_version < MIN_GL_CORE_VERSION
        {
            return Err(format!(
                "opengl core profile needs version {MIN_GL_CORE_VERSION} or newer, got {}",
                self.min_version
            ));
        }
        Ok(())
    }
}
