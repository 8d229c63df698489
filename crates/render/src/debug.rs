use crate::assets::SceneAssets;
use crate::backend::{FrameParams, FrameStatus, RenderBackend, RenderError};
use crate::mesh::Mesh;
use crate::uniforms::{UniformBlock, UniformSlot};
use viewscape_common::{AssetPaths, SurfaceSize};

/// Debug text backend: headless stand-in for the GPU.
///
/// Runs the same setup and per-frame uniform path as a real backend and
/// records a human-readable line per event. Useful for CLI output, logging,
/// and testing the viewport without a window.
#[derive(Debug, Default)]
pub struct DebugTextBackend {
    assets: Option<AssetPaths>,
    size: SurfaceSize,
    mesh: Option<Mesh>,
    texture_count: usize,
    uniforms: UniformBlock,
    log: Vec<String>,
    frames_drawn: u64,
    surface_lost: bool,
}

impl DebugTextBackend {
    /// Backend that skips reading resource files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that loads (and so validates) the given resource files on setup.
    pub fn with_assets(assets: AssetPaths) -> Self {
        Self {
            assets: Some(assets),
            ..Self::default()
        }
    }

    /// Make the next frame behave like a lost surface: reconfigured, not drawn.
    pub fn lose_surface(&mut self) {
        self.surface_lost = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

impl RenderBackend for DebugTextBackend {
    fn name(&self) -> &str {
        "debug-text"
    }

    fn initialize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        if let Some(paths) = &self.assets {
            let assets = SceneAssets::load(paths)?;
            self.texture_count = assets.textures.len();
        }
        let mesh = Mesh::textured_quad();
        self.log.push(format!(
            "init size={}x{} vertices={} indices={} textures={}",
            size.width,
            size.height,
            mesh.vertices.len(),
            mesh.index_count(),
            self.texture_count
        ));
        self.mesh = Some(mesh);
        self.size = size;
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.log
            .push(format!("resize {}x{}", size.width, size.height));
    }

    fn draw_frame(&mut self, frame: &FrameParams) -> Result<FrameStatus, RenderError> {
        let index_count = self
            .mesh
            .as_ref()
            .ok_or(RenderError::NotInitialized)?
            .index_count();

        if std::mem::take(&mut self.surface_lost) {
            self.log
                .push(format!("frame={} skipped: surface lost", frame.frame_index));
            return Ok(FrameStatus::Skipped);
        }

        self.uniforms.set_matrix4("model", frame.model)?;
        self.uniforms.set_matrix4("view", frame.view)?;
        self.uniforms.set_matrix4("projection", frame.projection)?;
        self.uniforms.set_float("texture_mix", frame.texture_mix)?;

        // eye position is the translation of the inverse view
        let eye = self
            .uniforms
            .matrix4(UniformSlot::View)
            .map(|v| v.inverse().w_axis.truncate())
            .unwrap_or_default();

        self.log.push(format!(
            "frame={} size={}x{} eye=({:.2}, {:.2}, {:.2}) indices={} mix={:.2}",
            frame.frame_index,
            self.size.width,
            self.size.height,
            eye.x,
            eye.y,
            eye.z,
            index_count,
            frame.texture_mix
        ));
        self.frames_drawn += 1;
        Ok(FrameStatus::Presented)
    }

    fn release(&mut self) {
        if self.mesh.take().is_some() {
            self.log.push("release".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn frame(index: u64, eye: Vec3) -> FrameParams {
        FrameParams {
            frame_index: index,
            model: Mat4::IDENTITY,
            view: Mat4::look_at_rh(eye, eye - Vec3::Z, Vec3::Y),
            projection: Mat4::IDENTITY,
            texture_mix: 0.2,
        }
    }

    #[test]
    fn draw_before_init_fails() {
        let mut backend = DebugTextBackend::new();
        assert!(matches!(
            backend.draw_frame(&frame(0, Vec3::ZERO)),
            Err(RenderError::NotInitialized)
        ));
    }

    #[test]
    fn records_frames_with_eye_position() {
        let mut backend = DebugTextBackend::new();
        backend.initialize(SurfaceSize::clamped(640, 480)).unwrap();
        let status = backend.draw_frame(&frame(0, Vec3::new(0.0, 0.0, 3.0))).unwrap();

        assert_eq!(status, FrameStatus::Presented);
        assert_eq!(backend.frames_drawn(), 1);
        let last = backend.log().last().unwrap();
        assert!(last.contains("frame=0"));
        assert!(last.contains(", 3.00)"), "{last}");
        assert!(last.contains("indices=6"));
    }

    #[test]
    fn lost_surface_skips_one_frame() {
        let mut backend = DebugTextBackend::new();
        backend.initialize(SurfaceSize::default()).unwrap();
        backend.lose_surface();

        let status = backend.draw_frame(&frame(0, Vec3::ZERO)).unwrap();
        assert_eq!(status, FrameStatus::Skipped);
        assert_eq!(backend.frames_drawn(), 0);
        assert_eq!(backend.log().last().unwrap(), "frame=0 skipped: surface lost");

        let status = backend.draw_frame(&frame(1, Vec3::ZERO)).unwrap();
        assert_eq!(status, FrameStatus::Presented);
        assert_eq!(backend.frames_drawn(), 1);
    }

    #[test]
    fn release_is_safe_without_init() {
        let mut backend = DebugTextBackend::new();
        backend.release();
        assert!(backend.log().is_empty());
        assert!(!backend.is_initialized());
    }

    #[test]
    fn missing_assets_fail_initialization() {
        let mut backend = DebugTextBackend::with_assets(AssetPaths {
            root: "/definitely/missing".into(),
            ..AssetPaths::default()
        });
        assert!(backend.initialize(SurfaceSize::default()).is_err());
        assert!(!backend.is_initialized());
    }
}
