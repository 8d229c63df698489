use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, after clamping.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Per-viewport frame clock.
///
/// Timestamps are supplied by the caller so the render loop stays
/// deterministic under test. Delta time is clamped so a stalled or
/// minimised window does not launch the camera across the scene.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self::with_clamps(start, Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(start: Instant, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: start,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(50));
        assert!((ft.dt - 0.05).abs() < 1.0e-6);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(100)).frame_index, 1);
    }

    #[test]
    fn clamps_long_stalls() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(10));
        assert!((ft.dt - 0.25).abs() < 1.0e-6);
    }

    #[test]
    fn clamps_zero_and_backwards_time() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new(t0);
        let ft = clock.tick_at(t0 - Duration::from_millis(5));
        assert!(ft.dt > 0.0);
    }
}
