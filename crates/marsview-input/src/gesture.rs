//! Double-click / double-tap recognition.

use std::time::{Duration, Instant};

/// Gap below which two presses count as one double gesture.
pub const DEFAULT_DOUBLE_GESTURE_WINDOW: Duration = Duration::from_millis(300);

/// Recognises two presses closer together than a time window.
///
/// A recognised pair resets the detector, so a third press starts a fresh
/// sequence rather than pairing with the second.
#[derive(Debug, Clone)]
pub struct DoubleGestureDetector {
    window: Duration,
    pending: Option<Instant>,
}

impl Default for DoubleGestureDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_GESTURE_WINDOW)
    }
}

impl DoubleGestureDetector {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a press at `now`. Returns `true` when it completes a double gesture.
    pub fn press(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(first) if now.saturating_duration_since(first) < self.window => {
                self.pending = None;
                true
            }
            _ => {
                self.pending = Some(now);
                false
            }
        }
    }

    /// Forget any half-finished gesture.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}
