// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Deterministic piecewise-linear gauge engine: line primitives, the
//! boundary walker, the determination engine, and the gauge entity with
//! its limit/dependent graph.

pub mod boundary;
pub mod determination;
pub mod gauge;
pub mod line;

pub use boundary::{Boundary, Side};
pub use determination::{Determination, MomentumEvent, Vertex};
pub use gauge::{Gauge, GaugeState, Limit, LimitState, MomentumInput, Whenever};
pub use line::Line;

// the types crate is part of the public surface
pub use gauge_types::{
    now, now_or, set_clock, system_clock, Clock, EventKind, FrozenClock, GaugeError, GaugeResult,
    Momentum, OutboundPolicy, SystemClock, INF,
};
