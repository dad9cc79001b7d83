// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Boundary Walker
// ─────────────────────────────────────────────────────────────────────
//! Walks the ordered lines of one limit trajectory. A ceiling walker
//! compares with `<` and picks the lower of two candidates; a floor
//! walker compares with `>` and picks the higher. Either way, `cmp(x, y)`
//! reads "x is beyond y in the constrained direction".

use crate::line::Line;

/// Which side of the band this walker guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ceiling,
    Floor,
}

/// Cursor over the finite line list of one limit.
#[derive(Debug)]
pub struct Boundary {
    lines: Vec<Line>,
    cursor: usize,
    side: Side,
}

impl Boundary {
    pub fn ceiling(lines: Vec<Line>) -> Boundary {
        Boundary::new(lines, Side::Ceiling)
    }

    pub fn floor(lines: Vec<Line>) -> Boundary {
        Boundary::new(lines, Side::Floor)
    }

    fn new(lines: Vec<Line>, side: Side) -> Boundary {
        debug_assert!(!lines.is_empty(), "a boundary needs at least one line");
        Boundary { lines, cursor: 0, side }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The current line. To select the next line, call [`step`].
    ///
    /// [`step`]: Boundary::step
    pub fn line(&self) -> &Line {
        &self.lines[self.cursor]
    }

    /// Advances to the next line. Running past the trailing horizon is an
    /// engine bug, not an input error.
    pub fn step(&mut self) {
        self.cursor += 1;
        assert!(
            self.cursor < self.lines.len(),
            "boundary walked past its trailing line"
        );
    }

    /// Whether another [`step`] is possible.
    ///
    /// [`step`]: Boundary::step
    pub fn exhausted(&self) -> bool {
        self.cursor + 1 >= self.lines.len()
    }

    /// `x` is beyond `y` in this side's constrained direction.
    pub fn cmp(&self, x: f64, y: f64) -> bool {
        match self.side {
            Side::Ceiling => x < y,
            Side::Floor => x > y,
        }
    }

    pub fn cmp_eq(&self, x: f64, y: f64) -> bool {
        x == y || self.cmp(x, y)
    }

    pub fn cmp_inv(&self, x: f64, y: f64) -> bool {
        x != y && !self.cmp(x, y)
    }

    /// The safer of two candidates: `min` for a ceiling, `max` for a
    /// floor, so the chosen value never pierces the boundary.
    pub fn best(&self, x: f64, y: f64) -> f64 {
        match self.side {
            Side::Ceiling => x.min(y),
            Side::Floor => x.max(y),
        }
    }
}
