use std::time::Instant;
use viewscape_common::SurfaceSize;
use viewscape_input::{Key, Modifiers};

/// Notifications a rendering surface delivers to the control embedded in it.
///
/// Hosts translate their platform events into these calls; nothing else
/// reaches the viewport.
pub trait SurfaceEvents {
    /// The surface can accept GPU work for the first time.
    fn on_ready(&mut self, size: SurfaceSize, now: Instant);
    fn on_resize(&mut self, width: u32, height: u32);
    fn on_redraw_requested(&mut self, now: Instant);
    fn on_key(&mut self, key: Key, modifiers: Modifiers);
    fn on_key_released(&mut self, key: Key, modifiers: Modifiers);
    /// Modifier state changed without a key event of its own.
    fn on_modifiers_changed(&mut self, modifiers: Modifiers);
    /// Pointer position in surface-local pixels.
    fn on_pointer_move(&mut self, x: f32, y: f32);
    /// The surface regained focus or the pointer re-entered it.
    fn on_activated(&mut self);
}

/// A surface notification as data, for scripted and headless hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Ready(SurfaceSize),
    Resize { width: u32, height: u32 },
    RedrawRequested,
    KeyDown(Key, Modifiers),
    KeyUp(Key, Modifiers),
    ModifiersChanged(Modifiers),
    PointerMove { x: f32, y: f32 },
    Activated,
}

/// Route one event to its handler.
pub fn dispatch<S: SurfaceEvents + ?Sized>(target: &mut S, event: SurfaceEvent, now: Instant) {
    match event {
        SurfaceEvent::Ready(size) => target.on_ready(size, now),
        SurfaceEvent::Resize { width, height } => target.on_resize(width, height),
        SurfaceEvent::RedrawRequested => target.on_redraw_requested(now),
        SurfaceEvent::KeyDown(key, modifiers) => target.on_key(key, modifiers),
        SurfaceEvent::KeyUp(key, modifiers) => target.on_key_released(key, modifiers),
        SurfaceEvent::ModifiersChanged(modifiers) => target.on_modifiers_changed(modifiers),
        SurfaceEvent::PointerMove { x, y } => target.on_pointer_move(x, y),
        SurfaceEvent::Activated => target.on_activated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl SurfaceEvents for Recorder {
        fn on_ready(&mut self, _: SurfaceSize, _: Instant) {
            self.0.push("ready");
        }
        fn on_resize(&mut self, _: u32, _: u32) {
            self.0.push("resize");
        }
        fn on_redraw_requested(&mut self, _: Instant) {
            self.0.push("redraw");
        }
        fn on_key(&mut self, _: Key, _: Modifiers) {
            self.0.push("key");
        }
        fn on_key_released(&mut self, _: Key, _: Modifiers) {
            self.0.push("key_up");
        }
        fn on_modifiers_changed(&mut self, _: Modifiers) {
            self.0.push("modifiers");
        }
        fn on_pointer_move(&mut self, _: f32, _: f32) {
            self.0.push("pointer");
        }
        fn on_activated(&mut self) {
            self.0.push("activated");
        }
    }

    #[test]
    fn dispatch_routes_each_event() {
        let now = Instant::now();
        let mut rec = Recorder::default();
        let script = [
            SurfaceEvent::Ready(SurfaceSize::default()),
            SurfaceEvent::Resize { width: 1, height: 0 },
            SurfaceEvent::KeyDown(Key::W, Modifiers::NONE),
            SurfaceEvent::KeyUp(Key::W, Modifiers::NONE),
            SurfaceEvent::ModifiersChanged(Modifiers::SHIFT),
            SurfaceEvent::PointerMove { x: 1.0, y: 2.0 },
            SurfaceEvent::Activated,
            SurfaceEvent::RedrawRequested,
        ];
        for event in script {
            dispatch(&mut rec, event, now);
        }
        assert_eq!(
            rec.0,
            [
                "ready",
                "resize",
                "key",
                "key_up",
                "modifiers",
                "pointer",
                "activated",
                "redraw"
            ]
        );
    }
}
