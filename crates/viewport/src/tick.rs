use std::time::{Duration, Instant};

/// Fixed-interval redraw timer, polled cooperatively by the host event loop.
///
/// Missed ticks are dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    next: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// When the host should wake up next, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns `true` if a tick is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        let mut upcoming = next + self.interval;
        if upcoming <= now {
            upcoming = now + self.interval;
        }
        self.next = Some(upcoming);
        true
    }
}
