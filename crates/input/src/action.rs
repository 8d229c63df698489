use glam::Vec2;
use viewscape_common::MoveDirection;

/// A camera action produced from raw input.
///
/// The viewport consumes actions, never platform key codes, so any host
/// (winit window, headless script) drives the camera the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate while the originating key is held.
    Move(MoveDirection),
    /// Rotate by a pointer delta in pixels.
    Look(Vec2),
}
