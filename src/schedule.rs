//! Clock-driven timers polled once per frame.
//!
//! Times are milliseconds on the same monotonic clock the frame loop is fed
//! (`performance.now()` in the browser).

/// Cancellable repeating task that fires immediately on start and then every
/// `period_ms`.
#[derive(Debug, Clone)]
pub struct AutoBloom {
    period_ms: f64,
    next_due: Option<f64>,
}

impl AutoBloom {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn start(&mut self, now: f64) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Starts or cancels; returns whether it is now running.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.is_running() {
            self.cancel();
        } else {
            self.start(now);
        }
        self.is_running()
    }

    /// True when a firing is due. Fires at most once per poll; a stall longer
    /// than one period does not produce a burst.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period_ms;
        if next <= now {
            next = now + self.period_ms;
        }
        self.next_due = Some(next);
        true
    }
}

/// Best-effort auto-clear for the vanish flag.
#[derive(Debug, Clone)]
pub struct VanishTimer {
    duration_ms: f64,
    until: Option<f64>,
}

impl VanishTimer {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            until: None,
        }
    }

    pub fn arm(&mut self, now: f64) {
        self.until = Some(now + self.duration_ms);
    }

    pub fn is_armed(&self) -> bool {
        self.until.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn expired(&mut self, now: f64) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

/// Fires once, `delay_ms` after the first poll.
#[derive(Debug, Clone)]
pub struct OneShot {
    delay_ms: f64,
    origin: Option<f64>,
    fired: bool,
}

impl OneShot {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            origin: None,
            fired: false,
        }
    }

    pub fn poll(&mut self, now: f64) -> bool {
        if self.fired {
            return false;
        }
        let origin = *self.origin.get_or_insert(now);
        if now - origin >= self.delay_ms {
            self.fired = true;
            return true;
        }
        false
    }
}
