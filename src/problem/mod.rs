//! Problem representation and objective evaluation.
//!
//! - [`FacilityProblem`]: cost matrix, facility budget, problem type, direction
//! - [`assignment`]: nearest-facility assignment, measures, aggregation
//! - [`Comparator`]: direction-aware ranking of objective values

pub mod assignment;
mod comparator;
mod instance;
mod types;

pub use assignment::{AssignmentRule, MeasureMap};
pub use comparator::Comparator;
pub use instance::{FacilityProblem, FacilityProblemBuilder};
pub use types::{Aggregate, Direction, Measure, ProblemType};

use crate::error::FacilityError;

/// Supplies problem instances from some dataset.
///
/// Parsing of concrete dataset formats lives outside this crate; loaders
/// implement this trait and hand the engines a validated instance.
pub trait ProblemSource {
    fn load(&self) -> Result<FacilityProblem, FacilityError>;
}
