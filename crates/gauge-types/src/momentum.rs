// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Momentum
// ─────────────────────────────────────────────────────────────────────
//! A momentum is a time-bounded constant velocity: while it is alive it
//! contributes its velocity to the gauge's free slope.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::INF;
use crate::error::{GaugeError, GaugeResult};

/// A power which increases or decreases a gauge continually between a
/// specific period. Immutable after creation.
///
/// Two momenta are equal iff all three fields are bitwise equal, so a
/// gauge can hold several indistinguishable copies and each still counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Momentum {
    /// Velocity in value units per second.
    pub velocity: f64,
    /// The time the momentum starts to affect the gauge (`-inf` = always).
    pub since: f64,
    /// The time the momentum stops affecting the gauge (`+inf` = never).
    pub until: f64,
}

impl Momentum {
    /// Creates a momentum effective between `since` and `until`.
    ///
    /// `since` must be earlier than `until` unless one of them is
    /// infinite.
    pub fn new(velocity: f64, since: f64, until: f64) -> GaugeResult<Momentum> {
        if since == -INF || until == INF || since < until {
            Ok(Momentum { velocity, since, until })
        } else {
            Err(GaugeError::InvalidMomentum { since, until })
        }
    }

    /// A momentum which is effective at every time.
    pub fn forever(velocity: f64) -> Momentum {
        Momentum { velocity, since: -INF, until: INF }
    }

    /// Sort key for the momenta set: by `until`, then `since`, then
    /// velocity. The relative order of exact ties is not observable.
    pub(crate) fn sort_cmp(&self, other: &Momentum) -> Ordering {
        self.until
            .total_cmp(&other.until)
            .then(self.since.total_cmp(&other.since))
            .then(self.velocity.total_cmp(&other.velocity))
    }

    /// Public comparison entry point for ordered containers.
    pub fn ordering(&self, other: &Momentum) -> Ordering {
        self.sort_cmp(other)
    }
}

impl PartialEq for Momentum {
    fn eq(&self, other: &Momentum) -> bool {
        self.velocity.to_bits() == other.velocity.to_bits()
            && self.since.to_bits() == other.since.to_bits()
            && self.until.to_bits() == other.until.to_bits()
    }
}

impl Eq for Momentum {}

impl std::hash::Hash for Momentum {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.velocity.to_bits().hash(state);
        self.since.to_bits().hash(state);
        self.until.to_bits().hash(state);
    }
}

impl fmt::Display for Momentum {
    /// `<Momentum +1.00/s 10.00~20.00>`; an infinite side renders empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Momentum {:+.2}/s", self.velocity)?;
        if self.since != -INF || self.until != INF {
            let since = if self.since == -INF {
                String::new()
            } else {
                format!("{:.2}", self.since)
            };
            let until = if self.until == INF {
                String::new()
            } else {
                format!("{:.2}", self.until)
            };
            write!(f, " {since}~{until}")?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_period() {
        assert!(Momentum::new(1.0, 1.0, 1.0).is_err());
        assert!(Momentum::new(1.0, 2.0, 1.0).is_err());
        assert!(Momentum::new(1.0, 1.0, 2.0).is_ok());
        // an infinite side lifts the check
        assert!(Momentum::new(1.0, -INF, -INF).is_ok());
        assert!(Momentum::new(1.0, INF, INF).is_ok());
    }

    #[test]
    fn test_bitwise_equality() {
        let a = Momentum::forever(1.0);
        let b = Momentum::forever(1.0);
        assert_eq!(a, b);
        let c = Momentum::forever(-0.0);
        let d = Momentum::forever(0.0);
        assert_ne!(c, d);
    }

    #[test]
    fn test_sort_by_until() {
        let mut momenta = vec![
            Momentum::new(1.0, 0.0, 9.0).unwrap(),
            Momentum::new(2.0, 0.0, 3.0).unwrap(),
            Momentum::forever(3.0),
        ];
        momenta.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(momenta[0].until, 3.0);
        assert_eq!(momenta[1].until, 9.0);
        assert_eq!(momenta[2].until, INF);
    }

    #[test]
    fn test_display() {
        let m = Momentum::new(100.0, 10.0, 20.0).unwrap();
        assert_eq!(m.to_string(), "<Momentum +100.00/s 10.00~20.00>");
        let m = Momentum::new(100.0, 10.0, INF).unwrap();
        assert_eq!(m.to_string(), "<Momentum +100.00/s 10.00~>");
        let m = Momentum::new(100.0, -INF, 20.0).unwrap();
        assert_eq!(m.to_string(), "<Momentum +100.00/s ~20.00>");
        let m = Momentum::forever(-1.0);
        assert_eq!(m.to_string(), "<Momentum -1.00/s>");
    }

    #[test]
    fn test_serde_round_trip() {
        let m = Momentum::new(-2.5, 1.0, 4.0).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Momentum = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
