//! Cancellable periodic tasks
//!
//! The racing engine has two triggers: the frame callback (motion and
//! collisions) and the spawn timer. Each is a `PeriodicTask` so it can be
//! cancelled on its own, and `advance` can interleave them by due time.

/// A periodic trigger on the session clock (milliseconds)
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    interval_ms: f64,
    next_due_ms: f64,
    running: bool,
}

impl PeriodicTask {
    /// Stopped task with the given period (at least 1 ms)
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            next_due_ms: 0.0,
            running: false,
        }
    }

    /// (Re)start; first firing one period after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = now_ms + self.interval_ms;
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Change the period; a pending firing keeps its due time
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(1.0);
    }

    /// Next due time, `None` when cancelled
    pub fn next_due(&self) -> Option<f64> {
        self.running.then_some(self.next_due_ms)
    }

    /// Consume one firing if due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.running && now_ms >= self.next_due_ms {
            self.next_due_ms += self.interval_ms;
            true
        } else {
            false
        }
    }
}
