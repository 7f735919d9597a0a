use std::time::{Duration, Instant};

/// Default scroll sample interval.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(200);

/// Rate limiter for a continuous sample stream.
///
/// At most one sample passes per interval. Samples arriving inside the window
/// replace the pending one, so the last sample wins when the window closes and
/// the caller flushes.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Offers a sample. Returns it when the window is open, otherwise keeps
    /// it as the pending sample and returns `None`.
    pub fn offer(&mut self, sample: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(sample)
        } else {
            self.pending = Some(sample);
            None
        }
    }

    /// Releases the pending sample once the window has closed.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() || !self.window_open(now) {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    /// Time left until a pending sample may be flushed.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_emit {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.last_emit = None;
        self.pending = None;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}
