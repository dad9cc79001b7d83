// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, constants, and error hierarchy for the Gauge
//! Kernel — a deterministic piecewise-linear gauge engine.

pub mod clock;
pub mod constants;
pub mod error;
pub mod momentum;

pub use clock::{now, now_or, set_clock, system_clock, Clock, FrozenClock, SystemClock};
pub use constants::{EventKind, OutboundPolicy, INF};
pub use error::{GaugeError, GaugeResult};
pub use momentum::Momentum;
