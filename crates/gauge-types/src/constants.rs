// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Constants
// ─────────────────────────────────────────────────────────────────────
//! Momentum event kinds and out-of-limits policies.

use serde::{Deserialize, Serialize};

/// Positive infinity, the open end of a momentum or limit horizon.
pub const INF: f64 = f64::INFINITY;

/// Kind of an entry in the momentum event stream.
///
/// The numeric values are part of the exported surface and double as the
/// tie-break order for events at the same time: a sentinel (`None`) sorts
/// before an `Add`, which sorts before a `Remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// Sentinel opening/closing the stream; carries no momentum.
    None = 0,
    /// A momentum starts to affect the gauge.
    Add = 1,
    /// A momentum stops affecting the gauge.
    Remove = 2,
}

/// What a mutation does when the new value would leave the limit band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutboundPolicy {
    /// Reject the mutation with [`GaugeError::OutOfRange`].
    ///
    /// [`GaugeError::OutOfRange`]: crate::error::GaugeError::OutOfRange
    #[default]
    Error = 0,
    /// Accept the new value unconditionally.
    Ok = 1,
    /// Accept once: behaves like `Ok` while the gauge is in range and
    /// like `Error` once it has already left the band.
    Once = 2,
    /// Clamp the new value to the violated limit, never below the
    /// previous value.
    Clamp = 3,
}
