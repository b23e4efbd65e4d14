use crate::core::geo::ViewportBounds;
use instant::Instant;
use std::time::Duration;

/// Coalesces rapid viewport-change events into a single settle.
///
/// Each new event replaces the pending payload and pushes the deadline out by
/// the full quiescence window; only the latest payload survives. Earlier
/// events are discarded, not queued. The pending callback is explicitly
/// cancellable so teardown can guarantee it never fires afterwards.
#[derive(Debug)]
pub struct SettleDebouncer {
    window: Duration,
    pending: Option<(ViewportBounds, Instant)>,
}

impl SettleDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedules (or reschedules) a settle for `bounds`, replacing any
    /// pending one.
    pub fn schedule(&mut self, bounds: ViewportBounds, now: Instant) {
        self.pending = Some((bounds, now + self.window));
    }

    /// Cancels the pending settle, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns the pending payload once its quiescence deadline has passed.
    /// Fires at most once per scheduled settle.
    pub fn due(&mut self, now: Instant) -> Option<ViewportBounds> {
        match self.pending {
            Some((bounds, deadline)) if now >= deadline => {
                self.pending = None;
                Some(bounds)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The configured quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(north: f64) -> ViewportBounds {
        ViewportBounds::new(north, north - 1.0, -122.0, -123.0)
    }

    #[test]
    fn test_fires_only_after_window() {
        let mut debouncer = SettleDebouncer::new(Duration::from_millis(500));
        let t0 = Instant::now();

        debouncer.schedule(bounds(38.0), t0);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.due(t0 + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.due(t0 + Duration::from_millis(600)),
            Some(bounds(38.0))
        );
        // Fires at most once
        assert_eq!(debouncer.due(t0 + Duration::from_millis(700)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_latest_payload_wins() {
        let mut debouncer = SettleDebouncer::new(Duration::from_millis(500));
        let t0 = Instant::now();

        debouncer.schedule(bounds(38.0), t0);
        debouncer.schedule(bounds(40.0), t0 + Duration::from_millis(100));

        // First deadline has passed but was superseded
        assert_eq!(debouncer.due(t0 + Duration::from_millis(550)), None);
        assert_eq!(
            debouncer.due(t0 + Duration::from_millis(650)),
            Some(bounds(40.0))
        );
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut debouncer = SettleDebouncer::new(Duration::from_millis(500));
        let t0 = Instant::now();

        debouncer.schedule(bounds(38.0), t0);
        debouncer.cancel();
        assert_eq!(debouncer.due(t0 + Duration::from_secs(10)), None);
    }
}
