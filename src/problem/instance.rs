//! The immutable problem instance shared by both engines.

use super::assignment::{self, AssignmentRule, MeasureMap};
use super::comparator::Comparator;
use super::types::{Direction, ProblemType};
use crate::error::FacilityError;

/// A discrete facility location instance.
///
/// Customers and candidate sites are the same `N` nodes; `costs[c][f]` is
/// the cost of serving customer `c` from site `f`. A solution opens exactly
/// `num_facilities` (`p`) distinct sites.
///
/// # Examples
///
/// ```
/// use u_facility::problem::{Direction, FacilityProblem, ProblemType};
///
/// let costs = vec![
///     vec![0, 2, 5, 9],
///     vec![2, 0, 4, 6],
///     vec![5, 4, 0, 3],
///     vec![9, 6, 3, 0],
/// ];
/// let problem = FacilityProblem::builder(costs, 2)
///     .problem_type("sum_star".parse().unwrap())
///     .direction(Direction::Minimize)
///     .build()
///     .unwrap();
/// assert_eq!(problem.evaluate(&[0, 1]), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityProblem {
    name: String,
    num_facilities: usize,
    costs: Vec<Vec<i64>>,
    demand: Vec<Vec<i64>>,
    problem_type: ProblemType,
    direction: Direction,
    assignment_rule: AssignmentRule,
}

impl FacilityProblem {
    /// Builds and validates an instance with default name and nearest assignment.
    pub fn new(
        costs: Vec<Vec<i64>>,
        num_facilities: usize,
        problem_type: ProblemType,
        direction: Direction,
    ) -> Result<Self, FacilityError> {
        Self::builder(costs, num_facilities)
            .problem_type(problem_type)
            .direction(direction)
            .build()
    }

    pub fn builder(costs: Vec<Vec<i64>>, num_facilities: usize) -> FacilityProblemBuilder {
        FacilityProblemBuilder {
            name: String::from("unnamed"),
            num_facilities,
            costs,
            demand: None,
            problem_type: ProblemType::default(),
            direction: Direction::default(),
            assignment_rule: AssignmentRule::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of facilities to open (`p`).
    pub fn num_facilities(&self) -> usize {
        self.num_facilities
    }

    /// Number of customers, which equals the number of candidate sites.
    pub fn num_customers(&self) -> usize {
        self.costs.len()
    }

    pub fn num_sites(&self) -> usize {
        self.costs.len()
    }

    pub fn costs(&self) -> &[Vec<i64>] {
        &self.costs
    }

    /// Demand weights. Carried for extension; objectives do not use them.
    pub fn demand(&self) -> &[Vec<i64>] {
        &self.demand
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.direction)
    }

    pub fn assignment_rule(&self) -> AssignmentRule {
        self.assignment_rule
    }

    /// Returns a copy of this instance scored under another problem type.
    pub fn with_problem_type(&self, problem_type: ProblemType) -> Self {
        Self {
            problem_type,
            ..self.clone()
        }
    }

    /// Customer → facility assignment for an open-facility set.
    pub fn assign(&self, facilities: &[usize]) -> Vec<usize> {
        self.assignment_rule.assign(&self.costs, facilities)
    }

    /// Per-facility measure map for an assignment.
    pub fn measures(&self, assignment: &[usize]) -> MeasureMap {
        assignment::measures_of(&self.costs, assignment, self.problem_type.measure)
    }

    /// Objective value of a customer assignment.
    pub fn objective(&self, assignment: &[usize]) -> i64 {
        assignment::aggregate(&self.measures(assignment), self.problem_type.aggregate)
    }

    /// Objective value of an open-facility set, computed from scratch.
    pub fn evaluate(&self, facilities: &[usize]) -> i64 {
        self.objective(&self.assign(facilities))
    }
}

/// Builder for [`FacilityProblem`].
#[derive(Debug, Clone)]
pub struct FacilityProblemBuilder {
    name: String,
    num_facilities: usize,
    costs: Vec<Vec<i64>>,
    demand: Option<Vec<Vec<i64>>>,
    problem_type: ProblemType,
    direction: Direction,
    assignment_rule: AssignmentRule,
}

impl FacilityProblemBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn demand(mut self, demand: Vec<Vec<i64>>) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn problem_type(mut self, problem_type: ProblemType) -> Self {
        self.problem_type = problem_type;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn assignment_rule(mut self, rule: AssignmentRule) -> Self {
        self.assignment_rule = rule;
        self
    }

    /// Validates the matrices and facility budget.
    pub fn build(self) -> Result<FacilityProblem, FacilityError> {
        let n = self.costs.len();
        if n == 0 {
            return Err(FacilityError::InvalidProblem("cost matrix is empty".into()));
        }
        if let Some((row, len)) = self
            .costs
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|&(_, len)| len != n)
        {
            return Err(FacilityError::InvalidProblem(format!(
                "cost matrix must be {n}x{n}, row {row} has {len} entries"
            )));
        }
        if self.costs.iter().flatten().any(|&c| c < 0) {
            return Err(FacilityError::InvalidProblem(
                "costs must be non-negative".into(),
            ));
        }
        if self.num_facilities == 0 || self.num_facilities >= n {
            return Err(FacilityError::InvalidProblem(format!(
                "facility budget must be in [1, {n}), got {}",
                self.num_facilities
            )));
        }

        let demand = match self.demand {
            Some(demand) => {
                if demand.len() != n || demand.iter().any(|r| r.len() != n) {
                    return Err(FacilityError::InvalidProblem(format!(
                        "demand matrix must be {n}x{n}"
                    )));
                }
                demand
            }
            None => vec![vec![1; n]; n],
        };

        Ok(FacilityProblem {
            name: self.name,
            num_facilities: self.num_facilities,
            costs: self.costs,
            demand,
            problem_type: self.problem_type,
            direction: self.direction,
            assignment_rule: self.assignment_rule,
        })
    }
}
