//! Adaptive Large Neighborhood Search (ALNS) over facility sets.
//!
//! Each iteration closes a few open facilities with a destroy operator,
//! reopens as many with a repair operator and runs the candidate through a
//! visited-set guard and a simulated-annealing test. Operator selection
//! probabilities adapt to the rewards each operator earned in the last
//! segment.
//!
//! # References
//!
//! Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic
//! for the Pickup and Delivery Problem with Time Windows"

mod config;
mod pool;
mod runner;
mod solution;
mod types;

pub use config::AlnsConfig;
pub use pool::{OperatorPool, OperatorRecord};
pub use runner::{acceptance_probability, starting_temperature, AlnsRunner, Outcome};
pub use solution::{FacilitySolution, SolutionKey, VisitedSet};
pub use types::{DestroyKind, DestroyOperator, FacilityOperator, RepairOperator};
