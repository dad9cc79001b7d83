// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Clock Seam
// ─────────────────────────────────────────────────────────────────────
//! The engine's only ambient input: a monotonic `now()` in wall-clock
//! seconds. Callers that omit an `at` argument read the process clock;
//! tests swap it for a [`FrozenClock`] to make every query deterministic.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

/// Source of the current time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock: seconds since the Unix epoch.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A clock pinned to an explicit time, advanced by hand.
#[derive(Debug, Default)]
pub struct FrozenClock {
    at: RwLock<f64>,
}

impl FrozenClock {
    pub fn at(time: f64) -> Arc<FrozenClock> {
        Arc::new(FrozenClock { at: RwLock::new(time) })
    }

    pub fn set(&self, time: f64) {
        *self.at.write() = time;
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> f64 {
        *self.at.read()
    }
}

static CLOCK: RwLock<Option<Arc<dyn Clock>>> = RwLock::new(None);

/// The current time from the installed clock.
pub fn now() -> f64 {
    if let Some(clock) = CLOCK.read().as_ref() {
        return clock.now();
    }
    SystemClock.now()
}

/// Returns the current time if `at` is `None`.
pub fn now_or(at: Option<f64>) -> f64 {
    at.unwrap_or_else(now)
}

/// Installs a process-wide clock. Intended for deterministic tests.
pub fn set_clock(clock: Arc<dyn Clock>) {
    *CLOCK.write() = Some(clock);
}

/// Restores the default system clock.
pub fn system_clock() {
    *CLOCK.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_clock() {
        let clock = FrozenClock::at(7.5);
        set_clock(clock.clone());
        assert_eq!(now(), 7.5);
        assert_eq!(now_or(None), 7.5);
        assert_eq!(now_or(Some(1.0)), 1.0);
        clock.set(9.0);
        assert_eq!(now(), 9.0);
        system_clock();
    }

    #[test]
    fn test_system_clock_progresses() {
        let clock = SystemClock;
        assert!(clock.now() > 0.0);
    }
}
