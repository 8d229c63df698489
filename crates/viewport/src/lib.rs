//! Viewport control: the piece a host window embeds to get a rendered,
//! camera-navigable scene.
//!
//! # Invariants
//! - Setup runs at most once; a failed setup is terminal and never draws.
//! - The camera exists only after setup succeeded.
//! - Surface sizes reaching the backend or camera are at least 1x1.
//! - Movement is scaled by measured frame time, not by tick count.
//! - Everything runs on the surface's thread; the tick is polled, never preemptive.

mod clock;
mod surface;
mod tick;
mod viewport;

pub use clock::{FrameClock, FrameTime};
pub use surface::{SurfaceEvent, SurfaceEvents, dispatch};
pub use tick::TickTimer;
pub use viewport::{Viewport, ViewportState};

pub fn crate_info() -> &'static str {
    "viewscape-viewport v0.1.0"
}
