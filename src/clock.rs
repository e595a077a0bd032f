// Time source for the gesture timers. The engine never reads the wall clock
// directly, so hold and debounce windows can be driven frame by frame in tests.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Current time as an offset from the Unix epoch.
    fn now(&self) -> Duration;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        // A clock set before 1970 just reads as the epoch.
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
    }
}

/// Hand-cranked clock; clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn set_secs(&self, secs: f64) {
        self.now.set(Duration::from_secs_f64(secs));
    }

    pub fn set_millis(&self, millis: u64) {
        self.now.set(Duration::from_millis(millis));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
