use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the filter being applied
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// A simple debouncer that tracks when an action should be triggered
/// after a period of inactivity
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The duration to wait after the last event before triggering
    delay: Duration,
    /// When the last event occurred
    last_event: Option<Instant>,
}

impl Debouncer {
    /// Create a new debouncer with the specified delay in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
        }
    }

    /// Register that an event occurred
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    pub fn trigger_at(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Returns true once, when the delay has passed since the last event
    pub fn should_execute(&mut self) -> bool {
        self.should_execute_at(Instant::now())
    }

    pub fn should_execute_at(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending action fires, `None` if nothing is pending
    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.last_event
            .map(|last| self.delay.saturating_sub(now.saturating_duration_since(last)))
    }

    /// Reset the debouncer, canceling any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Debounced search box: typed text waits for a quiet period, an explicit
/// submit goes through at once and drops whatever was waiting
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    debouncer: Debouncer,
    pending_term: Option<String>,
}

impl SearchDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            debouncer: Debouncer::new(delay_ms),
            pending_term: None,
        }
    }

    /// Text changed in the search box
    pub fn input(&mut self, term: &str) {
        self.input_at(term, Instant::now());
    }

    pub fn input_at(&mut self, term: &str, now: Instant) {
        self.pending_term = Some(term.trim().to_string());
        self.debouncer.trigger_at(now);
    }

    /// The term to apply, once the delay has elapsed
    pub fn poll(&mut self) -> Option<String> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<String> {
        if self.debouncer.should_execute_at(now) {
            self.pending_term.take()
        } else {
            None
        }
    }

    /// Enter pressed or search button clicked
    pub fn submit(&mut self, term: &str) -> String {
        self.cancel();
        term.trim().to_string()
    }

    pub fn cancel(&mut self) {
        self.debouncer.reset();
        self.pending_term = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_term.is_some()
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining_at(Instant::now())
    }

    /// Time until the pending term is applied
    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.pending_term.as_ref()?;
        self.debouncer.time_remaining_at(now)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new(300);

        search.input_at("vid", start);
        search.input_at("video ", start + Duration::from_millis(100));

        assert_eq!(search.poll_at(start + Duration::from_millis(350)), None);
        assert_eq!(
            search.poll_at(start + Duration::from_millis(400)),
            Some("video".to_string())
        );
        assert_eq!(search.poll_at(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_submit_bypasses_and_cancels() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new(300);

        search.input_at("mus", start);
        assert!(search.is_pending());

        assert_eq!(search.submit(" music "), "music");
        assert!(!search.is_pending());
        assert_eq!(search.poll_at(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_time_remaining() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);
        assert_eq!(debouncer.time_remaining_at(start), None);

        debouncer.trigger_at(start);
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
