// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Determination Engine
// ─────────────────────────────────────────────────────────────────────
//! Determines a gauge's trajectory from its base to the farthest future.
//!
//! The engine walks momentum events in time order and integrates the
//! piecewise-constant velocity into `(time, value)` vertices, switching
//! between two regimes:
//!
//! - *free*: the value moves by the sum of the live velocities;
//! - *bound*: the value sits on a limit line. While additionally
//!   *overlapped*, the free trajectory would pierce the limit and the
//!   value follows the limit line itself until it diverges back inward.
//!
//! Intersections between the current ray and the walking limit lines
//! decide the regime switches. A missed crossing caused by floating-point
//! rounding is repaired by snapping onto the boundary at the end of the
//! offending line.

use gauge_types::{EventKind, Momentum, INF};

use crate::boundary::Boundary;
use crate::line::Line;

/// One vertex of a determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub time: f64,
    pub value: f64,
}

/// The determined trajectory: vertices with strictly increasing times,
/// linear in between. After the last vertex the value continues at
/// `tail_velocity`, which is zero unless the trajectory ends unbounded
/// (for example a gauge riding an endless momentum with no finite limit
/// in its way).
#[derive(Debug, Clone, PartialEq)]
pub struct Determination {
    vertices: Vec<Vertex>,
    in_range_since: Option<f64>,
    tail_velocity: f64,
}

/// An entry of the momentum event stream consumed by the engine.
pub type MomentumEvent = (f64, EventKind, Option<Momentum>);

impl Determination {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The time the gauge started to be in range of its limits, if ever.
    pub fn in_range_since(&self) -> Option<f64> {
        self.in_range_since
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// First vertex. The engine always emits at least one.
    pub fn first(&self) -> Vertex {
        self.vertices[0]
    }

    pub fn last(&self) -> Vertex {
        self.vertices[self.vertices.len() - 1]
    }

    /// The velocity the trajectory keeps after the last vertex.
    pub fn tail_velocity(&self) -> f64 {
        self.tail_velocity
    }

    /// Interpolated `(value, velocity, clamp)` at `at`, where `clamp`
    /// tells the caller the in-range clamp against the current limit band
    /// applies to the returned value. At a vertex, the velocity is the
    /// outgoing segment's.
    pub(crate) fn sample(&self, at: f64) -> (f64, f64, bool) {
        let n = self.vertices.len();
        let x = self.vertices.partition_point(|v| v.time <= at);
        if x == 0 {
            return (self.vertices[0].value, 0.0, false);
        }
        if x == n {
            let last = self.vertices[n - 1];
            let value = last.value + self.tail_velocity * (at - last.time);
            let clamp = self
                .in_range_since
                .map_or(false, |in_range_since| in_range_since <= last.time);
            return (value, self.tail_velocity, clamp);
        }
        let Vertex { time: time1, value: value1 } = self.vertices[x - 1];
        let Vertex { time: time2, value: value2 } = self.vertices[x];
        let segment = Line::segment(time1, time2, value1, value2);
        let clamp = self
            .in_range_since
            .map_or(false, |in_range_since| in_range_since <= time1);
        (segment.value_at(at), segment.velocity(), clamp)
    }

    fn emit(&mut self, time: f64, value: f64, in_range: bool) {
        if let Some(last) = self.vertices.last() {
            if last.time == time {
                return;
            }
        }
        if in_range && self.in_range_since.is_none() {
            self.in_range_since = Some(time);
        }
        self.vertices.push(Vertex { time, value });
    }
}

impl std::ops::Index<usize> for Determination {
    type Output = Vertex;

    fn index(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }
}

/// Lines guarding one side when the limit is a constant.
pub(crate) fn constant_limit_lines(base_time: f64, value: f64) -> Vec<Line> {
    vec![Line::horizon(base_time, INF, value)]
}

/// Lines guarding one side when the limit is another gauge: an optional
/// leading horizon up to the limit's first vertex, one segment per vertex
/// pair, and a trailing horizon — or ray, if the limit keeps moving —
/// to the far future.
pub(crate) fn determined_limit_lines(base_time: f64, determination: &Determination) -> Vec<Line> {
    let first = determination.first();
    let last = determination.last();
    let mut lines = Vec::with_capacity(determination.len() + 1);
    if base_time < first.time {
        lines.push(Line::horizon(base_time, first.time, first.value));
    }
    for pair in determination.vertices().windows(2) {
        lines.push(Line::segment(pair[0].time, pair[1].time, pair[0].value, pair[1].value));
    }
    if determination.tail_velocity() == 0.0 {
        lines.push(Line::horizon(last.time, INF, last.value));
    } else {
        lines.push(Line::ray(last.time, INF, last.value, determination.tail_velocity()));
    }
    lines
}

/// Tracks which boundary, if any, currently pins the value.
#[derive(Debug, Clone, Copy)]
enum Regime {
    Free,
    Bound { index: usize, overlapped: bool },
}

impl Regime {
    fn bounded(&self) -> bool {
        matches!(self, Regime::Bound { .. })
    }

    fn in_range(&self) -> bool {
        match *self {
            Regime::Free => true,
            Regime::Bound { overlapped, .. } => overlapped,
        }
    }
}

/// Runs the determination from `(base_time, base_value)` over the given
/// momentum event stream, constrained by the ceiling and floor lines.
///
/// Total: always yields a finite vertex list whose first vertex sits at
/// `base_time`.
pub(crate) fn determine(
    base_time: f64,
    base_value: f64,
    events: impl IntoIterator<Item = MomentumEvent>,
    ceiling_lines: Vec<Line>,
    floor_lines: Vec<Line>,
) -> Determination {
    let mut determination =
        Determination { vertices: Vec::new(), in_range_since: None, tail_velocity: 0.0 };
    let mut since = base_time;
    let mut value = base_value;
    let mut velocity = 0.0;
    let mut velocities: Vec<f64> = Vec::new();
    let mut boundaries = [Boundary::ceiling(ceiling_lines), Boundary::floor(floor_lines)];
    let mut regime = Regime::Free;

    for index in 0..boundaries.len() {
        // skip lines that ended before the base
        while boundaries[index].line().until() <= since {
            boundaries[index].step();
        }
        // check an over-the-boundary start; the first satisfying side wins
        if regime.bounded() {
            continue;
        }
        let boundary_value = boundaries[index].line().guess(since);
        if boundaries[index].cmp(boundary_value, value) {
            regime = Regime::Bound { index, overlapped: false };
        }
    }

    'events: for (time, kind, momentum) in events {
        let until = time.max(base_time);
        // `again` reuses the current boundaries for one more pass instead
        // of choosing the next ones
        let mut again = true;
        while since < until {
            let walked_store: [usize; 2];
            let walked: &[usize] = if again {
                again = false;
                match regime {
                    Regime::Bound { index, .. } => {
                        walked_store = [index, index];
                        &walked_store[..1]
                    }
                    Regime::Free => {
                        walked_store = [0, 1];
                        &walked_store[..]
                    }
                }
            } else {
                // stop when every boundary reaches past this event
                if boundaries.iter().all(|b| b.line().until() >= until) {
                    break;
                }
                let index = if boundaries[0].line().until() <= boundaries[1].line().until() {
                    0
                } else {
                    1
                };
                boundaries[index].step();
                walked_store = [index, index];
                &walked_store[..1]
            };

            velocity = match regime {
                Regime::Free => velocities.iter().sum(),
                Regime::Bound { index, overlapped: true } => {
                    let free: f64 = velocities.iter().sum();
                    boundaries[index].best(free, boundaries[index].line().velocity())
                }
                Regime::Bound { index, overlapped: false } => {
                    // only momenta that push deeper out of range matter
                    velocities.iter().filter(|&&v| boundaries[index].cmp(v, 0.0)).sum()
                }
            };

            if let Regime::Bound { index, overlapped: true } = regime {
                if boundaries[index].cmp(velocity, boundaries[index].line().velocity()) {
                    // the free trajectory diverges inward: released
                    regime = Regime::Free;
                    again = true;
                    continue;
                }
                let bound_until = boundaries[index].line().until().min(until);
                if bound_until == INF {
                    break;
                }
                // ride the boundary line to its end
                since = bound_until;
                value = boundaries[index].line().value_at(bound_until);
                determination.emit(since, value, true);
                continue;
            }

            let line = Line::ray(since, until, value, velocity);
            for &index in walked {
                let Some((time, crossing)) = line.intersect(boundaries[index].line()) else {
                    continue;
                };
                if time == since {
                    continue;
                }
                again = true;
                regime = Regime::Bound { index, overlapped: true };
                since = time;
                // clamp by the boundary against rounding past it
                value = boundaries[index].best(crossing, boundaries[index].line().guess(since));
                determination.emit(since, value, true);
                break;
            }
            if regime.bounded() {
                continue;
            }
            for &index in walked {
                // find a crossing missed by floating-point inaccuracy
                let bound_until = boundaries[index].line().until().min(until);
                if bound_until == INF || bound_until < since {
                    continue;
                }
                let boundary_value = boundaries[index].line().value_at(bound_until);
                if boundaries[index].cmp_eq(line.value_at(bound_until), boundary_value) {
                    continue;
                }
                log::debug!(
                    "missed a boundary crossing near t={bound_until}; snapping to the boundary"
                );
                regime = Regime::Bound { index, overlapped: true };
                since = bound_until;
                value = boundary_value;
                determination.emit(since, value, true);
                break;
            }
        }

        if until == INF {
            // the trajectory keeps whatever velocity the last regime left,
            // except that a free tail touching a boundary must ride it
            // instead of piercing it (that crossing happens exactly at
            // `since`, which the intersection scan skips)
            if matches!(regime, Regime::Free) {
                for boundary in &boundaries {
                    let boundary_value = boundary.line().guess(since);
                    if boundary_value == value
                        && boundary.cmp(boundary.line().velocity(), velocity)
                    {
                        velocity = boundary.line().velocity();
                    }
                }
            }
            determination.tail_velocity = velocity;
            break 'events;
        }
        value += velocity * (until - since);
        determination.emit(until, value, regime.in_range());
        match (kind, momentum) {
            (EventKind::Add, Some(momentum)) => velocities.push(momentum.velocity),
            (EventKind::Remove, Some(momentum)) => {
                if let Some(position) = velocities.iter().position(|v| *v == momentum.velocity) {
                    velocities.remove(position);
                }
            }
            _ => {}
        }
        since = until;
    }

    determination
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel(time: f64) -> MomentumEvent {
        (time, EventKind::None, None)
    }

    /// Builds the event stream a gauge would feed the engine.
    fn events(base_time: f64, momenta: &[Momentum]) -> Vec<MomentumEvent> {
        let mut inner: Vec<MomentumEvent> = Vec::new();
        for momentum in momenta {
            inner.push((momentum.since, EventKind::Add, Some(*momentum)));
            if momentum.until != INF {
                inner.push((momentum.until, EventKind::Remove, Some(*momentum)));
            }
        }
        inner.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let mut all = vec![sentinel(base_time)];
        all.extend(inner);
        all.push(sentinel(INF));
        all
    }

    fn assert_vertices(determination: &Determination, expected: &[(f64, f64)]) {
        let got: Vec<(f64, f64)> =
            determination.vertices().iter().map(|v| (v.time, v.value)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_free_run_between_constant_limits() {
        let momenta = [Momentum::new(1.0, 1.0, 6.0).unwrap(), Momentum::new(-1.0, 3.0, 8.0).unwrap()];
        let determination = determine(
            0.0,
            12.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, 100.0),
            constant_limit_lines(0.0, 0.0),
        );
        assert_vertices(&determination, &[(0.0, 12.0), (1.0, 12.0), (3.0, 14.0), (6.0, 14.0), (8.0, 12.0)]);
        assert_eq!(determination.in_range_since(), Some(0.0));
    }

    #[test]
    fn test_ceiling_intersection() {
        let momenta = [Momentum::new(1.0, 0.0, 4.0).unwrap()];
        let determination = determine(
            0.0,
            8.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, 10.0),
            constant_limit_lines(0.0, 0.0),
        );
        assert_vertices(&determination, &[(0.0, 8.0), (2.0, 10.0), (4.0, 10.0)]);
    }

    #[test]
    fn test_over_the_ceiling_start() {
        let momenta = [Momentum::new(-1.0, 0.0, 4.0).unwrap()];
        let determination = determine(
            0.0,
            12.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, 10.0),
            constant_limit_lines(0.0, 0.0),
        );
        assert_vertices(&determination, &[(0.0, 12.0), (2.0, 10.0), (4.0, 8.0)]);
        // out of range until the value re-enters the band
        assert_eq!(determination.in_range_since(), Some(2.0));
    }

    #[test]
    fn test_no_momentum_is_a_single_vertex() {
        let determination = determine(
            0.0,
            1.0,
            events(0.0, &[]),
            constant_limit_lines(0.0, 10.0),
            constant_limit_lines(0.0, 0.0),
        );
        assert_vertices(&determination, &[(0.0, 1.0)]);
        assert_eq!(determination.sample(100.0), (1.0, 0.0, true));
    }

    #[test]
    fn test_bound_at_first_rides_a_rising_floor() {
        // floor starts later and rises above the falling value
        let floor = vec![
            Line::horizon(0.0, 1.0, 0.0),
            Line::segment(1.0, 11.0, 0.0, 10.0),
            Line::horizon(11.0, INF, 10.0),
        ];
        let momenta = [Momentum::new(-1.0, -INF, 10.0).unwrap()];
        let determination = determine(
            0.0,
            0.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, 10.0),
            floor,
        );
        assert_vertices(&determination, &[(0.0, 0.0), (1.0, 0.0), (10.0, 9.0), (11.0, 10.0)]);
    }

    #[test]
    fn test_vertical_segment_ceiling() {
        // a denormal-width segment behaves like a step function
        let ceiling = vec![
            Line::horizon(-1.0, 0.0, 0.0),
            Line::segment(0.0, 1e-309, 0.0, 1.0),
            Line::horizon(1e-309, INF, 1.0),
        ];
        let momenta = [Momentum::forever(-2.0), Momentum::forever(1.0)];
        let determination = determine(
            -1.0,
            2.5,
            events(-1.0, &momenta),
            ceiling,
            constant_limit_lines(-1.0, 0.0),
        );
        let rounded: Vec<(f64, f64)> = determination
            .vertices()
            .iter()
            .map(|v| ((v.time * 10.0).round() / 10.0, (v.value * 10.0).round() / 10.0))
            .collect();
        assert_eq!(rounded, vec![(-1.0, 2.5), (0.0, 0.5), (0.5, 0.0)]);
        // in range from the instant it fell back under the step
        assert!(determination.in_range_since().unwrap() < 1e-300);
    }

    #[test]
    fn test_unbounded_rise_keeps_tail_velocity() {
        let momenta = [Momentum::forever(1.0)];
        let determination = determine(
            0.0,
            10.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, INF),
            constant_limit_lines(0.0, 0.0),
        );
        assert_vertices(&determination, &[(0.0, 10.0)]);
        assert_eq!(determination.tail_velocity(), 1.0);
        assert_eq!(determination.sample(5.0), (15.0, 1.0, true));
    }

    #[test]
    fn test_sample_interpolates_and_flags_clamp() {
        let momenta = [Momentum::new(1.0, 0.0, 4.0).unwrap()];
        let determination = determine(
            0.0,
            8.0,
            events(0.0, &momenta),
            constant_limit_lines(0.0, 10.0),
            constant_limit_lines(0.0, 0.0),
        );
        let (value, velocity, clamp) = determination.sample(1.0);
        assert_eq!(value, 9.0);
        assert_eq!(velocity, 1.0);
        assert!(clamp);
        // before every vertex: first value, no motion
        assert_eq!(determination.sample(-1.0), (8.0, 0.0, false));
        // past the end: last value, no motion, still clamped in range
        assert_eq!(determination.sample(99.0), (10.0, 0.0, true));
    }

    #[test]
    fn test_duplicate_times_are_suppressed() {
        let mut determination =
            Determination { vertices: Vec::new(), in_range_since: None, tail_velocity: 0.0 };
        determination.emit(0.0, 1.0, false);
        determination.emit(0.0, 2.0, true);
        assert_vertices(&determination, &[(0.0, 1.0)]);
        // the suppressed emit does not latch in_range_since either
        assert_eq!(determination.in_range_since(), None);
        determination.emit(3.0, 2.0, true);
        assert_eq!(determination.in_range_since(), Some(3.0));
    }
}
