use std::time::{Duration, Instant};

/// Collapses a burst of events into one action after a quiet period.
pub struct Debouncer {
    quiet: Duration,
    last_trigger: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_trigger: None,
        }
    }

    /// Record an event at `now`, restarting the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.last_trigger = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }

    /// Returns true exactly once per burst, when `quiet` has passed since the
    /// latest trigger.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_trigger {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(150);

    #[test]
    fn test_idle_never_fires() {
        let mut d = Debouncer::new(QUIET);
        assert!(!d.poll(Instant::now()));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_fires_once_after_quiet() {
        let start = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.trigger(start);
        assert!(!d.poll(start + Duration::from_millis(100)));
        assert!(d.poll(start + Duration::from_millis(150)));
        assert!(!d.poll(start + Duration::from_millis(400)));
    }

    #[test]
    fn test_burst_restarts_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(QUIET);
        for ms in [0, 50, 100, 140] {
            d.trigger(start + Duration::from_millis(ms));
        }
        assert!(!d.poll(start + Duration::from_millis(200)));
        assert!(d.is_pending());
        assert!(d.poll(start + Duration::from_millis(290)));
    }
}
