//! Input mapping: platform-independent keys and pointer tracking turned into
//! camera actions.
//!
//! # Invariants
//! - Hosts never hand platform key codes to the viewport, only [`Key`].
//! - The first pointer move after activation never rotates the camera.

pub mod action;
pub mod keys;
pub mod pointer;

pub use action::Action;
pub use keys::{Key, KeyBindings, Modifiers};
pub use pointer::PointerTracker;

pub fn crate_info() -> &'static str {
    "viewscape-input v0.1.0"
}
