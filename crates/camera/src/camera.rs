use glam::{Mat4, Vec3};
use serde::Serialize;
use viewscape_common::{CameraConfig, MoveDirection};

/// Pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]` degrees so the basis never flips.
pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_MIN: f32 = 1.0;
pub const FOV_MAX: f32 = 90.0;
/// Smallest aspect ratio handed to the projection.
pub const MIN_ASPECT_RATIO: f32 = 1.0e-3;

const WORLD_UP: Vec3 = Vec3::Y;

/// First-person camera driven by yaw and pitch (degrees, no roll).
///
/// `front`, `right` and `up` are derived from yaw/pitch on every write and
/// always form an orthonormal basis.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pixel of pointer travel.
    pub sensitivity: f32,
}

impl Camera {
    /// Camera at `position` looking down -Z.
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        let defaults = CameraConfig::default();
        Self::from_config(
            &CameraConfig {
                start_position: position,
                ..defaults
            },
            aspect_ratio,
        )
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: config.start_position,
            front: -Vec3::Z,
            up: WORLD_UP,
            right: Vec3::X,
            yaw: 0.0,
            pitch: 0.0,
            fov: config.fov_degrees.clamp(FOV_MIN, FOV_MAX),
            aspect_ratio: 1.0,
            near: config.near,
            far: config.far,
            speed: config.speed,
            sensitivity: config.sensitivity,
        };
        camera.set_aspect_ratio(aspect_ratio);
        camera.yaw = wrap_degrees(config.start_yaw);
        camera.pitch = config.start_pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Set yaw in degrees. Wrapped into `[-180, 180)`; non-finite input is ignored.
    pub fn set_yaw(&mut self, degrees: f32) {
        if !degrees.is_finite() {
            tracing::warn!("ignoring non-finite yaw {degrees}");
            return;
        }
        self.yaw = wrap_degrees(degrees);
        self.update_vectors();
    }

    /// Set pitch in degrees, clamped to `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub fn set_pitch(&mut self, degrees: f32) {
        if !degrees.is_finite() {
            tracing::warn!("ignoring non-finite pitch {degrees}");
            return;
        }
        self.pitch = degrees.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn add_yaw(&mut self, degrees: f32) {
        self.set_yaw(self.yaw + degrees);
    }

    pub fn add_pitch(&mut self, degrees: f32) {
        self.set_pitch(self.pitch + degrees);
    }

    /// Field of view in degrees, clamped to `[FOV_MIN, FOV_MAX]`.
    pub fn set_fov(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.fov = degrees.clamp(FOV_MIN, FOV_MAX);
        }
    }

    /// Non-finite ratios are rejected; ratios at or below zero are clamped.
    pub fn set_aspect_ratio(&mut self, ratio: f32) {
        if !ratio.is_finite() {
            tracing::warn!("rejecting non-finite aspect ratio, keeping {}", self.aspect_ratio);
            return;
        }
        self.aspect_ratio = ratio.max(MIN_ASPECT_RATIO);
    }

    /// Update the aspect ratio from a surface size. A zero height counts as 1.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.set_aspect_ratio(width as f32 / height.max(1) as f32);
    }

    /// Apply a pointer delta in pixels: right turns right, down looks down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.add_yaw(dx * self.sensitivity);
        // screen y grows downward, pitch grows upward
        self.add_pitch(-dy * self.sensitivity);
    }

    /// Translate along the camera basis by `speed * dt`.
    pub fn advance(&mut self, direction: MoveDirection, dt: f32) {
        let step = self.speed * dt;
        let delta = match direction {
            MoveDirection::Forward => self.front * step,
            MoveDirection::Backward => -self.front * step,
            MoveDirection::Right => self.right * step,
            MoveDirection::Left => -self.right * step,
            MoveDirection::Up => self.up * step,
            MoveDirection::Down => -self.up * step,
        };
        self.position += delta;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio.max(MIN_ASPECT_RATIO),
            self.near,
            self.far,
        )
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.position,
            front: self.front,
            yaw: self.yaw,
            pitch: self.pitch,
            fov: self.fov,
            aspect_ratio: self.aspect_ratio,
        }
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

/// Serializable view of the camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub front: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect_ratio: f32,
}

fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for inputs just below -180
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1.0e-4;

    fn assert_orthonormal(cam: &Camera) {
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f}");
        assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r}");
        assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn default_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(cam.front().abs_diff_eq(-Vec3::Z, EPS));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
        assert_eq!(cam.yaw(), -90.0);
    }

    #[test]
    fn view_matrix_from_unit_z_three() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 3.0), 1.0);
        let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 2.0), Vec3::Y);
        assert!(cam.view_matrix().abs_diff_eq(expected, 1.0e-5));
    }

    #[test]
    fn forward_then_backward_returns() {
        let mut cam = Camera::new(Vec3::new(0.0, 0.0, 3.0), 1.0);
        cam.set_yaw(37.0);
        cam.set_pitch(12.0);
        let start = cam.position;

        cam.advance(MoveDirection::Forward, 1.0);
        assert!(cam.position.abs_diff_eq(start + cam.front() * cam.speed, EPS));

        cam.advance(MoveDirection::Backward, 1.0);
        assert!(cam.position.abs_diff_eq(start, EPS));
    }

    #[test]
    fn movement_scales_with_dt() {
        let mut a = Camera::default();
        let mut b = Camera::default();
        a.advance(MoveDirection::Right, 0.5);
        b.advance(MoveDirection::Right, 0.25);
        b.advance(MoveDirection::Right, 0.25);
        assert!(a.position.abs_diff_eq(b.position, EPS));
    }

    #[test]
    fn every_direction_is_undone_by_its_opposite() {
        for dir in MoveDirection::ALL {
            let mut cam = Camera::default();
            cam.set_yaw(-20.0);
            let start = cam.position;
            cam.advance(dir, 0.3);
            assert!(!cam.position.abs_diff_eq(start, EPS));
            cam.advance(dir.opposite(), 0.3);
            assert!(cam.position.abs_diff_eq(start, EPS), "{dir:?}");
        }
    }

    #[test]
    fn rotate_applies_sensitivity_and_inverts_y() {
        let mut cam = Camera::default();
        cam.sensitivity = 0.2;
        cam.rotate(10.0, 5.0);
        assert!((cam.yaw() - (-88.0)).abs() < EPS);
        assert!((cam.pitch() - (-1.0)).abs() < EPS);
    }

    #[test]
    fn yaw_wraps_without_clamping() {
        let mut cam = Camera::default();
        cam.set_yaw(270.0);
        assert!((cam.yaw() - (-90.0)).abs() < EPS);
        cam.set_yaw(-190.0);
        assert!((cam.yaw() - 170.0).abs() < EPS);
    }

    #[test]
    fn yaw_just_below_minus_180_stays_in_range() {
        let mut cam = Camera::default();
        cam.set_yaw(-180.00002);
        assert_eq!(cam.yaw(), -180.0);
        cam.set_yaw(180.0);
        assert_eq!(cam.yaw(), -180.0);
    }

    #[test]
    fn non_finite_angles_ignored() {
        let mut cam = Camera::default();
        cam.set_pitch(f32::NAN);
        cam.set_yaw(f32::INFINITY);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.yaw(), -90.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn fov_clamped() {
        let mut cam = Camera::default();
        cam.set_fov(0.0);
        assert_eq!(cam.fov(), FOV_MIN);
        cam.set_fov(170.0);
        assert_eq!(cam.fov(), FOV_MAX);
    }

    #[test]
    fn zero_height_viewport_keeps_projection_finite() {
        let mut cam = Camera::default();
        cam.set_viewport_size(800, 0);
        assert_eq!(cam.aspect_ratio(), 800.0);
        let proj = cam.projection_matrix();
        assert!(proj.is_finite());
    }

    #[test]
    fn degenerate_aspect_ratio_rejected_or_clamped() {
        let mut cam = Camera::default();
        cam.set_aspect_ratio(1.5);
        cam.set_aspect_ratio(f32::NAN);
        assert_eq!(cam.aspect_ratio(), 1.5);
        cam.set_aspect_ratio(0.0);
        assert_eq!(cam.aspect_ratio(), MIN_ASPECT_RATIO);
        assert!(cam.projection_matrix().is_finite());
    }

    #[test]
    fn snapshot_mirrors_state() {
        let cam = Camera::default();
        let snap = cam.snapshot();
        assert_eq!(snap.position, cam.position);
        assert_eq!(snap.yaw, cam.yaw());
    }

    proptest! {
        #[test]
        fn pitch_always_within_limits(pitch in -1.0e4f32..1.0e4) {
            let mut cam = Camera::default();
            cam.set_pitch(pitch);
            prop_assert!(cam.pitch() >= -PITCH_LIMIT && cam.pitch() <= PITCH_LIMIT);
        }

        #[test]
        fn accumulated_pitch_stays_clamped(steps in proptest::collection::vec(-50.0f32..50.0, 1..64)) {
            let mut cam = Camera::default();
            for step in steps {
                cam.add_pitch(step);
                prop_assert!(cam.pitch().abs() <= PITCH_LIMIT);
            }
        }

        #[test]
        fn yaw_always_within_half_open_range(yaw in -1.0e6f32..1.0e6) {
            let mut cam = Camera::default();
            cam.set_yaw(yaw);
            prop_assert!(cam.yaw() >= -180.0 && cam.yaw() < 180.0, "yaw {}", cam.yaw());
        }

        #[test]
        fn basis_is_orthonormal(yaw in -1.0e4f32..1.0e4, pitch in -180.0f32..180.0) {
            let mut cam = Camera::default();
            cam.set_yaw(yaw);
            cam.set_pitch(pitch);
            assert_orthonormal(&cam);
        }
    }
}
