//! Direction-aware comparison of objective values.

use super::types::Direction;
use std::cmp::Ordering;

/// Hides whether the objective is minimized or maximized.
///
/// Every place that ranks two objective values goes through a comparator:
/// acceptance, best-so-far tracking, measure sorting, swarm best selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Comparator {
    direction: Direction,
}

impl Comparator {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` iff `a` is strictly better than `b`.
    pub fn better_than<T: PartialOrd>(&self, a: T, b: T) -> bool {
        match self.direction {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Returns the better of the two values; ties resolve toward `b`.
    pub fn pick_better<T: PartialOrd>(&self, a: T, b: T) -> T {
        if self.better_than(&a, &b) {
            a
        } else {
            b
        }
    }

    /// Orders values from better to worse, for use with `sort_by`.
    pub fn ordering<T: PartialOrd>(&self, a: &T, b: &T) -> Ordering {
        if self.better_than(a, b) {
            Ordering::Less
        } else if self.better_than(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// How much better `candidate` is than `reference` (negative if worse).
    pub fn improvement(&self, reference: i64, candidate: i64) -> i64 {
        match self.direction {
            Direction::Minimize => reference - candidate,
            Direction::Maximize => candidate - reference,
        }
    }
}
