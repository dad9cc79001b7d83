// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::momentum::Momentum;

/// Root error type for all Gauge Kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaugeError {
    /// A mutation would push the value beyond a limit while the policy
    /// forbids it.
    #[error("out of range: the value to set is {value} but the limit is {limit}")]
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// The limit it would have crossed, at the mutation time.
        limit: f64,
    },

    /// A momentum whose `since` is not earlier than its `until`.
    #[error("'since' should be earlier than 'until' ({since} >= {until})")]
    InvalidMomentum { since: f64, until: f64 },

    /// `remove_momentum` was given a momentum the gauge does not hold.
    #[error("{0} is not in the gauge")]
    NotFound(Momentum),

    /// The gauge never crosses the requested value often enough.
    #[error("{}", unreachable_message(.target, .count))]
    Unreachable {
        /// The goal value that was asked for.
        target: f64,
        /// How many crossings exist in the determination.
        count: usize,
    },

    /// Arguments that contradict each other or the gauge's state.
    #[error("bad arguments: {0}")]
    BadArguments(String),
}

/// Result alias used across the Gauge Kernel crates.
pub type GaugeResult<T> = Result<T, GaugeError>;

fn unreachable_message(target: &f64, count: &usize) -> String {
    if *count == 0 {
        format!("the gauge will not reach {target}")
    } else {
        format!("the gauge will not reach {target} more than {count} times")
    }
}
