use glam::Vec2;

/// Turns absolute pointer positions into deltas.
///
/// The first position after construction or [`PointerTracker::reset`] only
/// establishes the baseline, so activating the surface never produces a jump.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the baseline; the next move is treated as the first.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }

    /// Record a pointer position in surface-local pixels.
    ///
    /// Returns the delta from the previous position, or `None` on the first move.
    pub fn track(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let pos = Vec2::new(x, y);
        let delta = self.last.map(|last| pos - last);
        self.last = Some(pos);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_delta() {
        let mut t = PointerTracker::new();
        assert!(!t.is_primed());
        assert_eq!(t.track(100.0, 50.0), None);
        assert!(t.is_primed());
    }

    #[test]
    fn subsequent_moves_report_delta() {
        let mut t = PointerTracker::new();
        t.track(100.0, 50.0);
        assert_eq!(t.track(110.0, 45.0), Some(Vec2::new(10.0, -5.0)));
        assert_eq!(t.track(110.0, 45.0), Some(Vec2::ZERO));
    }

    #[test]
    fn reset_drops_baseline() {
        let mut t = PointerTracker::new();
        t.track(0.0, 0.0);
        t.reset();
        assert_eq!(t.track(500.0, 500.0), None);
    }
}
