//! Viewport configuration, loaded from YAML.
//!
//! Every field has a default, so an empty or partial file is accepted.
//!
//! ```yaml
//! tick_interval_ms: 50
//! clear_color: [0.2, 0.7, 0.9, 1.0]
//! depth_test: true
//! camera:
//!   speed: 1.5
//! surface:
//!   api: opengl
//!   min_version: { major: 3, minor: 3 }
//! ```

use crate::surface::SurfaceRequest;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: Vec3,
    /// Initial yaw in degrees. -90 looks down -Z.
    pub start_yaw: f32,
    pub start_pitch: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of pointer travel.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 0.0, 3.0),
            start_yaw: -90.0,
            start_pitch: 0.0,
            fov_degrees: 90.0,
            near: 0.01,
            far: 100.0,
            speed: 1.5,
            sensitivity: 0.2,
        }
    }
}

/// Resource file locations. Relative paths resolve against `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// One entry per texture unit, in unit order.
    pub textures: Vec<PathBuf>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            vertex_shader: PathBuf::from("shaders/quad.vert.wgsl"),
            fragment_shader: PathBuf::from("shaders/quad.frag.wgsl"),
            textures: vec![
                PathBuf::from("textures/container.png"),
                PathBuf::from("textures/awesomeface.png"),
            ],
        }
    }
}

impl AssetPaths {
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.resolve(&self.vertex_shader)
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.resolve(&self.fragment_shader)
    }

    pub fn texture_paths(&self) -> Vec<PathBuf> {
        self.textures.iter().map(|p| self.resolve(p)).collect()
    }
}

/// Top-level viewport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Redraw interval of the periodic tick, in milliseconds.
    pub tick_interval_ms: u64,
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    /// Rotation of the model about X, in degrees per second.
    pub model_spin_degrees_per_second: f32,
    /// Blend weight of the second texture unit over the first.
    pub texture_mix: f32,
    /// Upper bound on the per-frame delta time, in milliseconds.
    pub max_frame_delta_ms: u64,
    pub camera: CameraConfig,
    pub assets: AssetPaths,
    pub surface: SurfaceRequest,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            clear_color: [0.2, 0.7, 0.9, 1.0],
            depth_test: true,
            model_spin_degrees_per_second: 0.0,
            texture_mix: 0.2,
            max_frame_delta_ms: 250,
            camera: CameraConfig::default(),
            assets: AssetPaths::default(),
            surface: SurfaceRequest::default(),
        }
    }
}

impl ViewportConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded viewport config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0".into()));
        }
        if self.max_frame_delta_ms == 0 {
            return Err(ConfigError::Invalid("max_frame_delta_ms must be > 0".into()));
        }
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid("clear_color must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.texture_mix) {
            return Err(ConfigError::Invalid(format!(
                "texture_mix must be within [0, 1], got {}",
                self.texture_mix
            )));
        }
        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.near < cam.far) {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !(1.0..=90.0).contains(&cam.fov_degrees) {
            return Err(ConfigError::Invalid(format!(
                "camera fov must be within [1, 90] degrees, got {}",
                cam.fov_degrees
            )));
        }
        if !cam.speed.is_finite() || !cam.sensitivity.is_finite() {
            return Err(ConfigError::Invalid(
                "camera speed and sensitivity must be finite".into(),
            ));
        }
        if !cam.start_position.is_finite() {
            return Err(ConfigError::Invalid("camera start_position must be finite".into()));
        }
        self.surface.check().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ContextProfile, GraphicsApi};
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = ViewportConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.camera.start_position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = ViewportConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ViewportConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let yaml = r#"
tick_interval_ms: 16
camera:
  speed: 4.0
surface:
  api: opengl
  min_version: { major: 4, minor: 1 }
"#;
        let config = ViewportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tick_interval_ms, 16);
        assert_eq!(config.camera.speed, 4.0);
        assert_eq!(config.camera.sensitivity, 0.2);
        assert_eq!(config.surface.api, GraphicsApi::OpenGl);
        assert_eq!(config.surface.profile, ContextProfile::Core);
    }

    #[test]
    fn zero_tick_rejected() {
        let err = ViewportConfig::from_yaml("tick_interval_ms: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_planes_rejected() {
        let yaml = "camera:\n  near: 10.0\n  far: 1.0\n";
        assert!(ViewportConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn invalid_surface_request_rejected() {
        let yaml = "surface:\n  api: vulkan\n  profile: compatibility\n";
        assert!(ViewportConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn yaml_roundtrip() {
        let config = ViewportConfig::default();
        let text = config.to_yaml().unwrap();
        let back = ViewportConfig::from_yaml(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "depth_test: false").unwrap();
        let config = ViewportConfig::load(tmp.path()).unwrap();
        assert!(!config.depth_test);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ViewportConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let text = include_str!("../../../viewscape.yaml");
        assert_eq!(ViewportConfig::from_yaml(text).unwrap(), ViewportConfig::default());
    }

    #[test]
    fn asset_paths_resolve_against_root() {
        let paths = AssetPaths::default();
        assert_eq!(
            paths.vertex_shader_path(),
            PathBuf::from("assets/shaders/quad.vert.wgsl")
        );
        assert_eq!(paths.texture_paths().len(), 2);
    }
}
