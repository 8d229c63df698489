//! First-person camera for the viewport.
//!
//! # Invariants
//! - The front/right/up basis is a pure function of yaw and pitch.
//! - Pitch never leaves `[-89, 89]` degrees; yaw wraps freely.
//! - Movement is scaled by elapsed time, never by frame count.

mod camera;

pub use camera::{Camera, CameraSnapshot, FOV_MAX, FOV_MIN, MIN_ASPECT_RATIO, PITCH_LIMIT};

pub fn crate_info() -> &'static str {
    "viewscape-camera v0.1.0"
}
