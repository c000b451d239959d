use std::time::{Duration, Instant};

/// Trailing-edge debouncer for resize signals.
///
/// Driven by explicit timestamps rather than a timer thread: the host
/// calls [`signal`](Self::signal) when a resize lands and polls
/// [`fire`](Self::fire) from its loop. Each new signal supersedes the
/// pending one, so a burst collapses into a single fire using whatever
/// the surface measures at that moment.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer. Returns true when a signal was already
    /// pending, i.e. this one coalesced into it.
    pub fn signal(&mut self, now: Instant) -> bool {
        let coalesced = self.deadline.is_some();
        self.deadline = Some(now + self.delay);
        coalesced
    }

    /// True once the armed deadline has passed. Firing disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Deadline of the pending fire, for hosts that poll with a timeout.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
