// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Gauge Entity
// ─────────────────────────────────────────────────────────────────────
//! A gauge has a value at any moment. It moves under its momenta and is
//! held inside a band whose ceiling and floor are constants or other
//! gauges. The determined trajectory is cached until this gauge — or any
//! gauge serving as one of its limits — mutates; invalidation then rolls
//! through the dependents graph.
//!
//! Handles are cheap clones sharing one interior; identity is pointer
//! identity. Dependents are held weakly, so dropping every handle of a
//! user gauge silently unlinks it from its limits.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use gauge_types::{now_or, EventKind, GaugeError, GaugeResult, Momentum, OutboundPolicy, INF};

use crate::determination::{
    constant_limit_lines, determine, determined_limit_lines, Determination, MomentumEvent,
};
use crate::line::Line;

type Shared = Arc<RwLock<GaugeInner>>;
type SharedWeak = Weak<RwLock<GaugeInner>>;

/// One side of the limit band: a constant or another gauge.
#[derive(Clone)]
pub enum Limit {
    Value(f64),
    Gauge(Gauge),
}

impl Limit {
    /// The limit's value at the given time.
    pub fn value_at(&self, at: Option<f64>) -> f64 {
        match self {
            Limit::Value(value) => *value,
            Limit::Gauge(gauge) => gauge.value_at(at),
        }
    }

    pub fn as_gauge(&self) -> Option<&Gauge> {
        match self {
            Limit::Value(_) => None,
            Limit::Gauge(gauge) => Some(gauge),
        }
    }

    pub fn as_value(&self) -> Option<f64> {
        match self {
            Limit::Value(value) => Some(*value),
            Limit::Gauge(_) => None,
        }
    }

    fn state(&self) -> LimitState {
        match self {
            Limit::Value(value) => LimitState::Value(*value),
            Limit::Gauge(gauge) => LimitState::Gauge(Box::new(gauge.state())),
        }
    }

    fn restore(state: &LimitState) -> GaugeResult<Limit> {
        Ok(match state {
            LimitState::Value(value) => Limit::Value(*value),
            LimitState::Gauge(state) => Limit::Gauge(Gauge::restore(state)?),
        })
    }
}

impl From<f64> for Limit {
    fn from(value: f64) -> Limit {
        Limit::Value(value)
    }
}

impl From<Gauge> for Limit {
    fn from(gauge: Gauge) -> Limit {
        Limit::Gauge(gauge)
    }
}

impl From<&Gauge> for Limit {
    fn from(gauge: &Gauge) -> Limit {
        Limit::Gauge(gauge.clone())
    }
}

impl PartialEq for Limit {
    fn eq(&self, other: &Limit) -> bool {
        match (self, other) {
            (Limit::Value(a), Limit::Value(b)) => a.to_bits() == b.to_bits(),
            (Limit::Gauge(a), Limit::Gauge(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Value(value) => write!(f, "Limit::Value({value})"),
            Limit::Gauge(_) => write!(f, "Limit::Gauge(..)"),
        }
    }
}

/// Accepted momentum argument: a bare velocity or a prebuilt momentum.
pub enum MomentumInput {
    Momentum(Momentum),
    Velocity(f64),
}

impl From<Momentum> for MomentumInput {
    fn from(momentum: Momentum) -> MomentumInput {
        MomentumInput::Momentum(momentum)
    }
}

impl From<f64> for MomentumInput {
    fn from(velocity: f64) -> MomentumInput {
        MomentumInput::Velocity(velocity)
    }
}

fn make_momentum(
    input: MomentumInput,
    since: Option<f64>,
    until: Option<f64>,
) -> GaugeResult<Momentum> {
    match input {
        MomentumInput::Momentum(momentum) => {
            if since.is_some() || until.is_some() {
                return Err(GaugeError::BadArguments(
                    "a prebuilt momentum takes no 'since'/'until'".to_owned(),
                ));
            }
            Momentum::new(momentum.velocity, momentum.since, momentum.until)
        }
        MomentumInput::Velocity(velocity) => {
            Momentum::new(velocity, since.unwrap_or(-INF), until.unwrap_or(INF))
        }
    }
}

/// An entry of the per-gauge event index. The momentum is referenced by
/// its insertion id so indistinguishable momenta stay distinct entries,
/// but same-instant ties order by the momentum value, which keeps the
/// event order stable across a state round trip.
#[derive(Debug, Clone, Copy)]
struct IndexedEvent {
    time: f64,
    kind: EventKind,
    id: u64,
    momentum: Momentum,
}

struct GaugeInner {
    base: (f64, f64),
    /// Live momenta ordered by `(until, since, velocity)`, then id.
    momenta: Vec<(u64, Momentum)>,
    /// Event index ordered by `(time, kind, momentum, id)`. Entries whose
    /// momentum is gone are pruned lazily when the stream is materialized.
    events: Vec<IndexedEvent>,
    next_momentum_id: u64,
    max: Limit,
    min: Limit,
    determination: Option<Arc<Determination>>,
    dependents: Vec<SharedWeak>,
}

impl GaugeInner {
    fn insert_momentum(&mut self, momentum: Momentum) {
        let id = self.next_momentum_id;
        self.next_momentum_id += 1;
        let position = self
            .momenta
            .partition_point(|(_, m)| m.ordering(&momentum) != std::cmp::Ordering::Greater);
        self.momenta.insert(position, (id, momentum));
        self.insert_event(momentum.since, EventKind::Add, id, momentum);
        if momentum.until != INF {
            self.insert_event(momentum.until, EventKind::Remove, id, momentum);
        }
    }

    fn insert_event(&mut self, time: f64, kind: EventKind, id: u64, momentum: Momentum) {
        let position = self.events.partition_point(|e| {
            e.time
                .total_cmp(&time)
                .then((e.kind as u8).cmp(&(kind as u8)))
                .then(e.momentum.ordering(&momentum))
                .then(e.id.cmp(&id))
                != std::cmp::Ordering::Greater
        });
        self.events.insert(position, IndexedEvent { time, kind, id, momentum });
    }

    fn prune_events(&mut self) {
        let momenta = &self.momenta;
        self.events.retain(|e| momenta.iter().any(|(id, _)| *id == e.id));
    }

    /// The ordered stream the determination engine consumes: an opening
    /// sentinel at the base time, the live index entries, and a terminal
    /// sentinel at the far future.
    fn momentum_events(&mut self) -> Vec<MomentumEvent> {
        self.prune_events();
        let mut stream = Vec::with_capacity(self.events.len() + 2);
        stream.push((self.base.0, EventKind::None, None));
        for event in &self.events {
            stream.push((event.time, event.kind, Some(event.momentum)));
        }
        stream.push((INF, EventKind::None, None));
        stream
    }
}

/// A cheap-clone handle to one gauge.
pub struct Gauge {
    inner: Shared,
}

impl Clone for Gauge {
    fn clone(&self) -> Gauge {
        Gauge { inner: Arc::clone(&self.inner) }
    }
}

impl PartialEq for Gauge {
    fn eq(&self, other: &Gauge) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Gauge {}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Gauge")
            .field("base", &inner.base)
            .field("momenta", &inner.momenta.len())
            .finish_non_exhaustive()
    }
}

impl Gauge {
    /// Creates a gauge anchored at `(at, value)` between the given
    /// limits. An out-of-band starting value is allowed; the gauge is
    /// simply not in range until the trajectory re-enters the band.
    pub fn new(value: f64, max: impl Into<Limit>, min: impl Into<Limit>, at: Option<f64>) -> Gauge {
        let at = now_or(at);
        let max = max.into();
        let min = min.into();
        let gauge = Gauge {
            inner: Arc::new(RwLock::new(GaugeInner {
                base: (at, value),
                momenta: Vec::new(),
                events: Vec::new(),
                next_momentum_id: 0,
                max: max.clone(),
                min: min.clone(),
                determination: None,
                dependents: Vec::new(),
            })),
        };
        if let Limit::Gauge(limit) = &max {
            limit.register_dependent(&gauge);
        }
        if let Limit::Gauge(limit) = &min {
            limit.register_dependent(&gauge);
        }
        gauge
    }

    /// The base time and value the trajectory is anchored at.
    pub fn base(&self) -> (f64, f64) {
        self.inner.read().base
    }

    // ── determination cache ───────────────────────────────────────

    /// The cached determination, rebuilt on demand.
    pub fn determination(&self) -> Arc<Determination> {
        if let Some(determination) = self.inner.read().determination.clone() {
            return determination;
        }
        let (base, events, max, min) = {
            let mut inner = self.inner.write();
            (inner.base, inner.momentum_events(), inner.max.clone(), inner.min.clone())
        };
        let ceiling = limit_lines(base.0, &max);
        let floor = limit_lines(base.0, &min);
        let determination = Arc::new(determine(base.0, base.1, events, ceiling, floor));
        self.inner.write().determination = Some(Arc::clone(&determination));
        determination
    }

    /// Drops the cached determination here and in every dependent.
    /// Returns whether this gauge actually held a cache.
    pub fn invalidate(&self) -> bool {
        let had_cache = self.inner.write().determination.take().is_some();
        for dependent in self.dependents() {
            dependent.invalidate();
        }
        had_cache
    }

    /// Gauges that use this gauge as a limit. Dead entries are pruned.
    pub fn dependents(&self) -> Vec<Gauge> {
        let mut inner = self.inner.write();
        inner.dependents.retain(|weak| weak.strong_count() > 0);
        inner
            .dependents
            .iter()
            .filter_map(Weak::upgrade)
            .map(|inner| Gauge { inner })
            .collect()
    }

    fn register_dependent(&self, dependent: &Gauge) {
        let mut inner = self.inner.write();
        let exists = inner
            .dependents
            .iter()
            .any(|weak| weak.upgrade().map_or(false, |arc| Arc::ptr_eq(&arc, &dependent.inner)));
        if !exists {
            inner.dependents.push(Arc::downgrade(&dependent.inner));
        }
    }

    fn deregister_dependent(&self, dependent: &Gauge) {
        self.inner.write().dependents.retain(|weak| {
            weak.upgrade()
                .map_or(false, |arc| !Arc::ptr_eq(&arc, &dependent.inner))
        });
    }

    // ── limits ────────────────────────────────────────────────────

    pub fn max_limit(&self) -> Limit {
        self.inner.read().max.clone()
    }

    pub fn min_limit(&self) -> Limit {
        self.inner.read().min.clone()
    }

    /// Predicts the maximum at the given time.
    pub fn get_max(&self, at: Option<f64>) -> f64 {
        self.max_limit().value_at(at)
    }

    /// Predicts the minimum at the given time.
    pub fn get_min(&self, at: Option<f64>) -> f64 {
        self.min_limit().value_at(at)
    }

    pub fn set_max(&self, max: impl Into<Limit>, at: Option<f64>) -> GaugeResult<()> {
        self.set_range(Some(max.into()), None, at)
    }

    pub fn set_min(&self, min: impl Into<Limit>, at: Option<f64>) -> GaugeResult<()> {
        self.set_range(None, Some(min.into()), at)
    }

    /// Changes one or both limits.
    ///
    /// If the gauge is in range at `at`, the value is clamped into the
    /// new band; either way the gauge is rebased so stale momenta are
    /// dropped. A limit gauge that (transitively) uses this gauge as its
    /// own limit is rejected, as that would make the two determinations
    /// depend on each other.
    pub fn set_range(
        &self,
        max: Option<Limit>,
        min: Option<Limit>,
        at: Option<f64>,
    ) -> GaugeResult<()> {
        let at = now_or(at);
        for limit in [&max, &min].into_iter().flatten() {
            if let Limit::Gauge(gauge) = limit {
                if gauge.depends_on(self) {
                    return Err(GaugeError::BadArguments(
                        "a limit gauge must not depend on the gauge it limits".to_owned(),
                    ));
                }
            }
        }
        let base_time = self.base().0;
        let mut forget_until = at;
        for limit in [&max, &min].into_iter().flatten() {
            if let Limit::Gauge(gauge) = limit {
                forget_until = forget_until.min(gauge.base().0);
            }
        }
        let forget_until = forget_until.max(base_time);
        let in_range = self.in_range(Some(at));
        let rewound_value = self.value_at(Some(forget_until));
        let current_value = self.value_at(Some(at));
        self.install_limits(max, min);
        self.invalidate();
        if in_range {
            let clamped = self.clamp_value(current_value, Some(at));
            self.forget_past_at(Some(clamped), at)?;
        } else {
            self.forget_past_at(Some(rewound_value), forget_until)?;
        }
        Ok(())
    }

    fn install_limits(&self, max: Option<Limit>, min: Option<Limit>) {
        if let Some(new) = max {
            let old = self.inner.read().max.clone();
            if let Limit::Gauge(gauge) = &old {
                gauge.deregister_dependent(self);
            }
            if let Limit::Gauge(gauge) = &new {
                gauge.register_dependent(self);
            }
            self.inner.write().max = new;
        }
        if let Some(new) = min {
            let old = self.inner.read().min.clone();
            if let Limit::Gauge(gauge) = &old {
                gauge.deregister_dependent(self);
            }
            if let Limit::Gauge(gauge) = &new {
                gauge.register_dependent(self);
            }
            self.inner.write().min = new;
        }
    }

    /// Whether this gauge's limit closure reaches `other`.
    fn depends_on(&self, other: &Gauge) -> bool {
        if self == other {
            return true;
        }
        let (max, min) = {
            let inner = self.inner.read();
            (inner.max.clone(), inner.min.clone())
        };
        for limit in [max, min] {
            if let Limit::Gauge(gauge) = limit {
                if gauge.depends_on(other) {
                    return true;
                }
            }
        }
        false
    }

    /// Clamps a value into the limit band at the given time.
    pub fn clamp_value(&self, value: f64, at: Option<f64>) -> f64 {
        let at = now_or(at);
        let max = self.get_max(Some(at));
        if value > max {
            return max;
        }
        let min = self.get_min(Some(at));
        if value < min {
            return min;
        }
        value
    }

    /// Pulls the current value back into the limit band.
    pub fn clamp(&self, at: Option<f64>) -> GaugeResult<f64> {
        let at = now_or(at);
        let clamped = self.clamp_value(self.value_at(Some(at)), Some(at));
        self.set(clamped, OutboundPolicy::Ok, Some(at))
    }

    // ── queries ───────────────────────────────────────────────────

    fn value_and_velocity(&self, at: Option<f64>) -> (f64, f64) {
        let at = now_or(at);
        let determination = self.determination();
        let (value, velocity, clamp) = determination.sample(at);
        if clamp {
            (self.clamp_value(value, Some(at)), velocity)
        } else {
            (value, velocity)
        }
    }

    /// Predicts the value at the given time.
    pub fn value_at(&self, at: Option<f64>) -> f64 {
        self.value_and_velocity(at).0
    }

    /// Predicts the velocity at the given time.
    pub fn velocity_at(&self, at: Option<f64>) -> f64 {
        self.value_and_velocity(at).1
    }

    /// The value the trajectory settles at (the last determined vertex).
    pub fn goal(&self) -> f64 {
        self.determination().last().value
    }

    /// Whether the value is within the limit band at the given time.
    pub fn in_range(&self, at: Option<f64>) -> bool {
        let at = now_or(at);
        self.determination()
            .in_range_since()
            .map_or(false, |since| since <= at)
    }

    /// The time the gauge reaches `value` for the `(nth + 1)`-th time.
    pub fn when(&self, value: f64, nth: usize) -> GaugeResult<f64> {
        let mut count = 0;
        for (index, time) in self.whenever(value).enumerate() {
            if index == nth {
                return Ok(time);
            }
            count = index + 1;
        }
        Err(GaugeError::Unreachable { target: value, count })
    }

    /// Lazily yields every time the trajectory crosses `value`.
    pub fn whenever(&self, value: f64) -> Whenever {
        Whenever {
            determination: self.determination(),
            target: value,
            index: 0,
            started: false,
            tail_done: false,
        }
    }

    // ── momenta ───────────────────────────────────────────────────

    /// The live momenta, in storage order.
    pub fn momenta(&self) -> Vec<Momentum> {
        self.inner.read().momenta.iter().map(|(_, momentum)| *momentum).collect()
    }

    /// Adds a momentum and returns it, for later removal.
    ///
    /// Accepts either a velocity plus optional `since`/`until`, or a
    /// prebuilt [`Momentum`] alone.
    pub fn add_momentum(
        &self,
        input: impl Into<MomentumInput>,
        since: Option<f64>,
        until: Option<f64>,
    ) -> GaugeResult<Momentum> {
        let momentum = make_momentum(input.into(), since, until)?;
        self.inner.write().insert_momentum(momentum);
        self.invalidate();
        Ok(momentum)
    }

    /// Removes one occurrence of the given momentum and returns it.
    pub fn remove_momentum(
        &self,
        input: impl Into<MomentumInput>,
        since: Option<f64>,
        until: Option<f64>,
    ) -> GaugeResult<Momentum> {
        let momentum = make_momentum(input.into(), since, until)?;
        {
            let mut inner = self.inner.write();
            let position = inner
                .momenta
                .iter()
                .position(|(_, m)| *m == momentum)
                .ok_or(GaugeError::NotFound(momentum))?;
            inner.momenta.remove(position);
        }
        self.invalidate();
        Ok(momentum)
    }

    /// The ordered momentum event stream, pruning stale index entries.
    pub fn momentum_events(&self) -> Vec<MomentumEvent> {
        self.inner.write().momentum_events()
    }

    // ── rebase family ─────────────────────────────────────────────

    /// Moves the base to `(at, value)`, dropping the first `drop_before`
    /// momenta. Dependents are told first so they can project themselves
    /// forward against the still-unchanged limit trajectory.
    fn rebase(&self, value: Option<f64>, at: f64, drop_before: usize) -> GaugeResult<f64> {
        let base_time = self.base().0;
        if at < base_time {
            return Err(GaugeError::BadArguments(format!(
                "cannot rebase at {at}, earlier than the base time {base_time}"
            )));
        }
        let value = match value {
            Some(value) => value,
            None => self.value_at(Some(at)),
        };
        for dependent in self.dependents() {
            dependent.on_limit_rebased(self, value, at)?;
        }
        {
            let mut inner = self.inner.write();
            inner.base = (at, value);
            inner.momenta.drain(..drop_before);
        }
        self.invalidate();
        Ok(value)
    }

    /// A limit gauge of ours is about to rebase to `limit_value` at `at`:
    /// project our value forward, clamp it against the new limit value if
    /// we are in range, and rebase ourselves.
    fn on_limit_rebased(&self, limit: &Gauge, limit_value: f64, at: f64) -> GaugeResult<()> {
        let at = at.max(self.base().0);
        let mut value = self.value_at(Some(at));
        if self.in_range(Some(at)) {
            let is_max = matches!(&self.inner.read().max, Limit::Gauge(gauge) if gauge == limit);
            value = if is_max { value.min(limit_value) } else { value.max(limit_value) };
        }
        self.forget_past_at(Some(value), at)?;
        Ok(())
    }

    /// Discards the momenta which cannot affect the future from `at` and
    /// rebases there. Fails when `at` is earlier than the base time.
    pub fn forget_past(&self, value: Option<f64>, at: Option<f64>) -> GaugeResult<f64> {
        self.forget_past_at(value, now_or(at))
    }

    fn forget_past_at(&self, value: Option<f64>, at: f64) -> GaugeResult<f64> {
        let drop_before = self
            .inner
            .read()
            .momenta
            .partition_point(|(_, momentum)| momentum.until < at);
        self.rebase(value, at, drop_before)
    }

    /// Removes every momentum, pinning the value at `value` (or the
    /// current value) from `at` on.
    pub fn clear_momenta(&self, value: Option<f64>, at: Option<f64>) -> GaugeResult<f64> {
        let at = now_or(at);
        let drop_before = self.inner.read().momenta.len();
        self.rebase(value, at, drop_before)
    }

    // ── mutations ─────────────────────────────────────────────────

    /// Increases the value by `delta` at `at`, honoring `outbound`.
    pub fn incr(
        &self,
        delta: f64,
        outbound: OutboundPolicy,
        at: Option<f64>,
    ) -> GaugeResult<f64> {
        let at = now_or(at);
        let previous = self.value_at(Some(at));
        let mut value = previous + delta;
        let outbound = if outbound == OutboundPolicy::Once {
            if self.in_range(Some(at)) {
                OutboundPolicy::Ok
            } else {
                OutboundPolicy::Error
            }
        } else {
            outbound
        };
        match outbound {
            OutboundPolicy::Ok | OutboundPolicy::Once => {}
            OutboundPolicy::Clamp => {
                if delta > 0.0 {
                    let max = self.get_max(Some(at));
                    if value > max {
                        value = previous.max(max);
                    }
                } else if delta < 0.0 {
                    let min = self.get_min(Some(at));
                    if value < min {
                        value = previous.min(min);
                    }
                }
            }
            OutboundPolicy::Error => {
                if delta > 0.0 {
                    let max = self.get_max(Some(at));
                    if value > max {
                        return Err(GaugeError::OutOfRange { value, limit: max });
                    }
                } else if delta < 0.0 {
                    let min = self.get_min(Some(at));
                    if value < min {
                        return Err(GaugeError::OutOfRange { value, limit: min });
                    }
                }
            }
        }
        self.forget_past_at(Some(value), at)
    }

    /// Decreases the value by `delta` at `at`.
    pub fn decr(
        &self,
        delta: f64,
        outbound: OutboundPolicy,
        at: Option<f64>,
    ) -> GaugeResult<f64> {
        self.incr(-delta, outbound, at)
    }

    /// Sets the value at `at`.
    pub fn set(&self, value: f64, outbound: OutboundPolicy, at: Option<f64>) -> GaugeResult<f64> {
        let at = now_or(at);
        let delta = value - self.value_at(Some(at));
        self.incr(delta, outbound, Some(at))
    }

    // ── persistence seam ──────────────────────────────────────────

    /// A plain snapshot of this gauge and, recursively, its limit
    /// gauges.
    pub fn state(&self) -> GaugeState {
        let inner = self.inner.read();
        GaugeState {
            base: inner.base,
            momenta: inner
                .momenta
                .iter()
                .map(|(_, m)| (m.velocity, m.since, m.until))
                .collect(),
            max: inner.max.state(),
            min: inner.min.state(),
        }
    }

    /// Rebuilds a gauge from a snapshot, re-registering it with its
    /// (also rebuilt) limit gauges.
    pub fn restore(state: &GaugeState) -> GaugeResult<Gauge> {
        let max = Limit::restore(&state.max)?;
        let min = Limit::restore(&state.min)?;
        let gauge = Gauge::new(state.base.1, max, min, Some(state.base.0));
        for (velocity, since, until) in &state.momenta {
            gauge.add_momentum(Momentum::new(*velocity, *since, *until)?, None, None)?;
        }
        Ok(gauge)
    }
}

fn limit_lines(base_time: f64, limit: &Limit) -> Vec<Line> {
    match limit {
        Limit::Value(value) => constant_limit_lines(base_time, *value),
        Limit::Gauge(gauge) => determined_limit_lines(base_time, &gauge.determination()),
    }
}

/// Serializable snapshot of one limit side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LimitState {
    Value(f64),
    Gauge(Box<GaugeState>),
}

/// Serializable snapshot of a gauge: base, momenta as
/// `(velocity, since, until)` triples, and both limit sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeState {
    pub base: (f64, f64),
    pub momenta: Vec<(f64, f64, f64)>,
    pub max: LimitState,
    pub min: LimitState,
}

/// Iterator over the times a determination crosses a target value.
pub struct Whenever {
    determination: Arc<Determination>,
    target: f64,
    index: usize,
    started: bool,
    tail_done: bool,
}

impl Iterator for Whenever {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let determination = Arc::clone(&self.determination);
        if !self.started {
            self.started = true;
            if determination.first().value == self.target {
                return Some(determination.first().time);
            }
        }
        while self.index + 1 < determination.len() {
            let from = determination[self.index];
            let to = determination[self.index + 1];
            self.index += 1;
            let rising = from.value < self.target && self.target <= to.value;
            let falling = from.value > self.target && self.target >= to.value;
            if rising || falling {
                let ratio = (self.target - from.value) / (to.value - from.value);
                return Some(from.time + (to.time - from.time) * ratio);
            }
        }
        if !self.tail_done {
            self.tail_done = true;
            let tail = determination.tail_velocity();
            let last = determination.last();
            if (tail > 0.0 && self.target > last.value)
                || (tail < 0.0 && self.target < last.value)
            {
                return Some(last.time + (self.target - last.value) / tail);
            }
        }
        None
    }
}
