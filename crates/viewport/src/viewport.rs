use crate::clock::FrameClock;
use crate::surface::SurfaceEvents;
use crate::tick::TickTimer;
use glam::Mat4;
use std::collections::BTreeSet;
use std::time::Instant;
use viewscape_camera::Camera;
use viewscape_common::{SurfaceSize, ViewportConfig};
use viewscape_input::{Action, Key, KeyBindings, Modifiers, PointerTracker};
use viewscape_render::{FrameParams, FrameStatus, RenderBackend, RenderError};

/// Observable lifecycle state of a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportState {
    /// Waiting for the surface's first ready notification.
    Uninitialized,
    /// GPU resources and camera exist; no frame drawn yet.
    Ready,
    /// At least one frame has been drawn.
    Rendering,
    /// Setup failed; the viewport will never draw.
    Failed,
    /// Resources released and tick stopped.
    Disposed,
}

/// State that only exists once setup has succeeded.
struct Scene {
    camera: Camera,
    pointer: PointerTracker,
    clock: FrameClock,
    held: BTreeSet<Key>,
    modifiers: Modifiers,
    elapsed: f32,
    frame_index: u64,
}

enum Phase {
    Uninitialized,
    Ready(Scene),
    Rendering(Scene),
    Failed(RenderError),
    Disposed,
}

/// Viewport control: owns a render backend, drives the redraw tick and
/// relays surface input to the camera.
///
/// Lifecycle: `Uninitialized -> Ready -> Rendering -> Disposed`, with
/// `Failed` as the terminal state for setup errors. Every method is meant
/// to be called from the thread that owns the surface.
pub struct Viewport<B: RenderBackend> {
    backend: B,
    config: ViewportConfig,
    bindings: KeyBindings,
    size: SurfaceSize,
    tick: TickTimer,
    phase: Phase,
}

impl<B: RenderBackend> Viewport<B> {
    pub fn new(backend: B, config: ViewportConfig) -> Self {
        let tick = TickTimer::new(config.tick_interval());
        Self {
            backend,
            config,
            bindings: KeyBindings::default(),
            size: SurfaceSize::default(),
            tick,
            phase: Phase::Uninitialized,
        }
    }

    pub fn state(&self) -> ViewportState {
        match self.phase {
            Phase::Uninitialized => ViewportState::Uninitialized,
            Phase::Ready(_) => ViewportState::Ready,
            Phase::Rendering(_) => ViewportState::Rendering,
            Phase::Failed(_) => ViewportState::Failed,
            Phase::Disposed => ViewportState::Disposed,
        }
    }

    /// The camera, once setup has completed.
    pub fn camera(&self) -> Option<&Camera> {
        self.scene().map(|s| &s.camera)
    }

    /// The setup error, if the viewport failed.
    pub fn failure(&self) -> Option<&RenderError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn frames_rendered(&self) -> u64 {
        self.scene().map_or(0, |s| s.frame_index)
    }

    /// Returns `true` when the periodic tick wants a redraw at `now`.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        self.scene().is_some() && self.tick.poll(now)
    }

    /// Next tick deadline, for hosts that sleep between events.
    pub fn next_tick(&self) -> Option<Instant> {
        self.tick.next_deadline()
    }

    /// Stop the tick and release every GPU handle. Idempotent and safe in
    /// any state, including before setup.
    pub fn dispose(&mut self) {
        if matches!(self.phase, Phase::Disposed) {
            return;
        }
        self.tick.stop();
        self.backend.release();
        let frames = self.frames_rendered();
        self.phase = Phase::Disposed;
        tracing::info!(
            "viewport disposed ({} backend, {frames} frames)",
            self.backend.name()
        );
    }

    /// Apply one camera action. `dt` scales movement; look deltas ignore it.
    fn apply(camera: &mut Camera, action: Action, dt: f32) {
        match action {
            Action::Move(direction) => camera.advance(direction, dt),
            Action::Look(delta) => camera.rotate(delta.x, delta.y),
        }
    }

    fn scene(&self) -> Option<&Scene> {
        match &self.phase {
            Phase::Ready(scene) | Phase::Rendering(scene) => Some(scene),
            _ => None,
        }
    }

    fn scene_mut(&mut self) -> Option<&mut Scene> {
        match &mut self.phase {
            Phase::Ready(scene) | Phase::Rendering(scene) => Some(scene),
            _ => None,
        }
    }
}

impl<B: RenderBackend> SurfaceEvents for Viewport<B> {
    fn on_ready(&mut self, size: SurfaceSize, now: Instant) {
        if !matches!(self.phase, Phase::Uninitialized) {
            tracing::warn!("ignoring repeated ready notification in {:?}", self.state());
            return;
        }
        self.size = SurfaceSize::clamped(size.width, size.height);

        let setup = self
            .config
            .validate()
            .map_err(RenderError::from)
            .and_then(|()| self.backend.initialize(self.size));
        if let Err(err) = setup {
            tracing::error!("viewport initialization failed: {err}");
            self.backend.release();
            self.phase = Phase::Failed(err);
            return;
        }

        let camera = Camera::from_config(&self.config.camera, self.size.aspect_ratio());
        let clock = FrameClock::with_clamps(
            now,
            std::time::Duration::from_micros(100),
            self.config.max_frame_delta(),
        );
        self.phase = Phase::Ready(Scene {
            camera,
            pointer: PointerTracker::new(),
            clock,
            held: BTreeSet::new(),
            modifiers: Modifiers::NONE,
            elapsed: 0.0,
            frame_index: 0,
        });
        self.tick.start(now);
        tracing::info!(
            "viewport ready: {} backend, {}x{}, tick every {:?}",
            self.backend.name(),
            self.size.width,
            self.size.height,
            self.tick.interval()
        );
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if matches!(self.phase, Phase::Disposed | Phase::Failed(_)) {
            return;
        }
        self.size = SurfaceSize::clamped(width, height);
        tracing::debug!("viewport resized to {}x{}", self.size.width, self.size.height);

        let size = self.size;
        if let Some(scene) = self.scene_mut() {
            scene.camera.set_viewport_size(size.width, size.height);
            self.backend.resize(size);
        }
    }

    fn on_redraw_requested(&mut self, now: Instant) {
        let Self {
            backend,
            config,
            bindings,
            phase,
            ..
        } = self;
        let (Phase::Ready(scene) | Phase::Rendering(scene)) = phase else {
            tracing::trace!("redraw requested before ready, skipping");
            return;
        };

        let ft = scene.clock.tick_at(now);
        let modifiers = Modifiers {
            shift: scene.modifiers.shift || scene.held.contains(&Key::Shift),
            ..scene.modifiers
        };
        for direction in bindings.resolve_held(&scene.held, modifiers) {
            Self::apply(&mut scene.camera, Action::Move(direction), ft.dt);
        }
        scene.elapsed += ft.dt;

        let spin = (config.model_spin_degrees_per_second * scene.elapsed).to_radians();
        let frame = FrameParams {
            frame_index: scene.frame_index,
            model: Mat4::from_rotation_x(spin),
            view: scene.camera.view_matrix(),
            projection: scene.camera.projection_matrix(),
            texture_mix: config.texture_mix,
        };
        let presented = match backend.draw_frame(&frame) {
            Ok(FrameStatus::Presented) => {
                scene.frame_index += 1;
                true
            }
            Ok(FrameStatus::Skipped) => {
                tracing::debug!("frame {} skipped by {} backend", frame.frame_index, backend.name());
                false
            }
            Err(err) => {
                tracing::warn!("frame {} not drawn: {err}", frame.frame_index);
                false
            }
        };

        if presented && matches!(self.phase, Phase::Ready(_)) {
            if let Phase::Ready(scene) = std::mem::replace(&mut self.phase, Phase::Disposed) {
                self.phase = Phase::Rendering(scene);
            }
        }
    }

    fn on_key(&mut self, key: Key, modifiers: Modifiers) {
        if let Some(scene) = self.scene_mut() {
            scene.modifiers = modifiers;
            scene.held.insert(key);
        }
    }

    fn on_key_released(&mut self, key: Key, modifiers: Modifiers) {
        if let Some(scene) = self.scene_mut() {
            scene.modifiers = modifiers;
            // modifier state may lag behind the shift key-up itself
            if key == Key::Shift {
                scene.modifiers.shift = false;
            }
            scene.held.remove(&key);
        }
    }

    fn on_modifiers_changed(&mut self, modifiers: Modifiers) {
        if let Some(scene) = self.scene_mut() {
            scene.modifiers = modifiers;
        }
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        if let Some(scene) = self.scene_mut() {
            if let Some(delta) = scene.pointer.track(x, y) {
                Self::apply(&mut scene.camera, Action::Look(delta), 0.0);
            }
        }
    }

    fn on_activated(&mut self) {
        if let Some(scene) = self.scene_mut() {
            scene.pointer.reset();
            scene.held.clear();
            tracing::debug!("viewport activated, pointer baseline cleared");
        }
    }
}

impl<B: RenderBackend> Drop for Viewport<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
