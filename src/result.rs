//! The result surface shared by both engines.

use crate::problem::{Direction, ProblemType};

/// Outcome of one engine run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Wall-clock duration of the run in seconds.
    pub elapsed_seconds: f64,

    /// Objective of the best facility set found.
    pub objective: i64,

    /// The best facility set found.
    pub open_facilities: Vec<usize>,

    /// Customer → facility assignment of the best set, indexed by customer.
    pub customer_assignment: Vec<usize>,

    /// Problem type the objective was computed under.
    pub problem_type: ProblemType,

    /// Direction the objective was optimized in.
    pub direction: Direction,

    /// Engine-level iterations performed.
    pub iterations: usize,
}

impl SearchResult {
    /// Open facilities in ascending id order.
    pub fn sorted_facilities(&self) -> Vec<usize> {
        let mut facilities = self.open_facilities.clone();
        facilities.sort_unstable();
        facilities
    }
}
