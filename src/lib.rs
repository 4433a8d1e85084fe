//! Metaheuristics for discrete facility location.
//!
//! Given an `N x N` cost matrix and a budget `p`, the engines search for the
//! set of `p` open facilities that optimizes an objective built from two
//! choices:
//!
//! - a per-facility **measure** over the customers it serves: star (sum of
//!   costs), radius (largest cost) or ray (smallest cost);
//! - an **aggregate** over open facilities: max, min or sum.
//!
//! Customers always go to their cheapest open facility unless another
//! [`AssignmentRule`](problem::AssignmentRule) is chosen. Either direction can
//! be optimized.
//!
//! Two engines are provided:
//!
//! - **ALNS**: Adaptive Large Neighborhood Search with destroy/repair
//!   operators, adaptive roulette-wheel selection, simulated-annealing
//!   acceptance and a visited-solution guard.
//! - **NDPSO**: a discrete particle swarm in which each particle moves to the
//!   best of three single-exchange perturbations of its position, its
//!   personal best and the swarm's best.
//!
//! [`tuning`] adds grid search over engine parameters and batch runs.
//!
//! # Example
//!
//! ```
//! use u_facility::listener::NoopListener;
//! use u_facility::problem::{Aggregate, Direction, FacilityProblem, Measure, ProblemType};
//! use u_facility::pso::{NdpsoConfig, NdpsoRunner};
//!
//! let costs = vec![
//!     vec![0, 3, 7, 8],
//!     vec![3, 0, 4, 6],
//!     vec![7, 4, 0, 2],
//!     vec![8, 6, 2, 0],
//! ];
//! let problem = FacilityProblem::new(
//!     costs,
//!     2,
//!     ProblemType::new(Aggregate::Sum, Measure::Star),
//!     Direction::Minimize,
//! )?;
//!
//! let config = NdpsoConfig::default().with_max_iterations(50).with_seed(1);
//! let result = NdpsoRunner::new(config).run(&problem, &mut NoopListener)?;
//! assert_eq!(result.objective, problem.evaluate(&result.open_facilities));
//! # Ok::<(), u_facility::FacilityError>(())
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and spans but never installs a
//! subscriber.

pub mod alns;
pub mod error;
pub mod listener;
pub mod optimizer;
pub mod problem;
pub mod pso;
pub mod random;
pub mod result;
pub mod tuning;

pub use error::FacilityError;
pub use optimizer::Optimizer;
pub use result::SearchResult;
