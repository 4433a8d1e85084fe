//! Destroy and repair operators for facility solutions.

use super::solution::FacilitySolution;
use crate::error::FacilityError;
use crate::problem::FacilityProblem;
use crate::random::sample_closed_site;
use rand::Rng;
use std::fmt;

/// Common surface of pool members.
pub trait FacilityOperator {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &'static str;
}

/// Which facilities a destroy operator closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestroyKind {
    /// Uniformly at random, without replacement.
    RandomQ,
    /// The facilities with the least favorable measure.
    WorstQ,
    /// The facilities with the most favorable measure.
    BestQ,
}

/// Closes `num_to_change` open facilities, leaving as many pending slots.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestroyOperator {
    kind: DestroyKind,
    num_to_change: usize,
}

impl DestroyOperator {
    pub fn new(kind: DestroyKind, num_to_change: usize) -> Self {
        Self {
            kind,
            num_to_change,
        }
    }

    pub fn random(num_to_change: usize) -> Self {
        Self::new(DestroyKind::RandomQ, num_to_change)
    }

    pub fn worst(num_to_change: usize) -> Self {
        Self::new(DestroyKind::WorstQ, num_to_change)
    }

    pub fn best(num_to_change: usize) -> Self {
        Self::new(DestroyKind::BestQ, num_to_change)
    }

    pub fn kind(&self) -> DestroyKind {
        self.kind
    }

    pub fn num_to_change(&self) -> usize {
        self.num_to_change
    }

    pub fn with_num_to_change(self, num_to_change: usize) -> Self {
        Self {
            num_to_change,
            ..self
        }
    }

    /// Closes facilities in place.
    ///
    /// Fails with [`FacilityError::InvariantViolation`] when fewer than
    /// `num_to_change` facilities are open, or when the open count plus
    /// pending slots no longer equals `p` afterwards.
    pub fn destroy<R: Rng>(
        &self,
        solution: &mut FacilitySolution,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        let q = self.num_to_change;
        let open = solution.open_facilities().len();
        if q > open {
            return Err(FacilityError::InvariantViolation(format!(
                "{} cannot close {q} of {open} open facilities",
                self.name()
            )));
        }

        match self.kind {
            DestroyKind::RandomQ => {
                let mut indices = rand::seq::index::sample(rng, open, q).into_vec();
                indices.sort_unstable_by(|a, b| b.cmp(a));
                for index in indices {
                    solution.remove_at(index)?;
                }
            }
            DestroyKind::WorstQ => {
                solution.sort_by_measure(problem);
                for _ in 0..q {
                    let last = solution.open_facilities().len() - 1;
                    solution.remove_at(last)?;
                }
            }
            DestroyKind::BestQ => {
                solution.sort_by_measure(problem);
                for _ in 0..q {
                    solution.remove_at(0)?;
                }
            }
        }

        let total = solution.open_facilities().len() + solution.unassigned_slots();
        if total != problem.num_facilities() {
            return Err(FacilityError::InvariantViolation(format!(
                "{} left {} open and {} pending, expected {}",
                self.name(),
                solution.open_facilities().len(),
                solution.unassigned_slots(),
                problem.num_facilities()
            )));
        }
        Ok(())
    }
}

impl FacilityOperator for DestroyOperator {
    fn name(&self) -> &'static str {
        match self.kind {
            DestroyKind::RandomQ => "random_q",
            DestroyKind::WorstQ => "worst_q",
            DestroyKind::BestQ => "best_q",
        }
    }
}

impl fmt::Display for DestroyOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.num_to_change)
    }
}

/// Refills pending slots and re-evaluates the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepairOperator {
    /// Opens uniformly random closed sites.
    Random,
    /// Local-search insertion. Currently inserts exactly like `Random`; any
    /// replacement must still fill every slot and recompute the solution.
    LocalSearch,
}

impl RepairOperator {
    /// Fills every pending slot, then recomputes assignment and objective
    /// once.
    pub fn repair<R: Rng>(
        &self,
        solution: &mut FacilitySolution,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        match self {
            RepairOperator::Random | RepairOperator::LocalSearch => {
                random_insertion(solution, problem, rng)?
            }
        }
        solution.recompute(problem);

        if !solution.is_complete(problem) {
            return Err(FacilityError::InvariantViolation(format!(
                "{} finished with {} open and {} pending, expected {}",
                self.name(),
                solution.open_facilities().len(),
                solution.unassigned_slots(),
                problem.num_facilities()
            )));
        }
        Ok(())
    }
}

fn random_insertion<R: Rng>(
    solution: &mut FacilitySolution,
    problem: &FacilityProblem,
    rng: &mut R,
) -> Result<(), FacilityError> {
    while solution.unassigned_slots() > 0 {
        let site = sample_closed_site(solution.open_facilities(), problem.num_sites(), rng)?;
        solution.insert(site)?;
    }
    Ok(())
}

impl FacilityOperator for RepairOperator {
    fn name(&self) -> &'static str {
        match self {
            RepairOperator::Random => "random_repair",
            RepairOperator::LocalSearch => "local_search_repair",
        }
    }
}

impl fmt::Display for RepairOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Aggregate, Direction, Measure, ProblemType};
    use crate::random::create_rng;

    fn problem(direction: Direction) -> FacilityProblem {
        let costs = vec![
            vec![0, 2, 5, 9, 7, 4],
            vec![2, 0, 4, 6, 8, 3],
            vec![5, 4, 0, 3, 6, 5],
            vec![9, 6, 3, 0, 2, 7],
            vec![7, 8, 6, 2, 0, 1],
            vec![4, 3, 5, 7, 1, 0],
        ];
        FacilityProblem::new(
            costs,
            3,
            ProblemType::new(Aggregate::Sum, Measure::Star),
            direction,
        )
        .unwrap()
    }

    fn sorted(facilities: &[usize]) -> Vec<usize> {
        let mut v = facilities.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_random_destroy_closes_q() {
        let problem = problem(Direction::Minimize);
        let mut rng = create_rng(4);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        DestroyOperator::random(2)
            .destroy(&mut solution, &problem, &mut rng)
            .unwrap();
        assert_eq!(solution.open_facilities().len(), 1);
        assert_eq!(solution.unassigned_slots(), 2);
        assert!([0, 2, 4].contains(&solution.open_facilities()[0]));
    }

    #[test]
    fn test_worst_and_best_destroy() {
        // Assignment [0, 0, 2, 4, 4, 4]: stars 0 -> 2, 2 -> 0, 4 -> 3.
        let problem = problem(Direction::Minimize);
        let mut rng = create_rng(4);

        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        assert_eq!(solution.customer_assignment(), &[0, 0, 2, 4, 4, 4]);
        DestroyOperator::worst(1)
            .destroy(&mut solution, &problem, &mut rng)
            .unwrap();
        assert_eq!(sorted(solution.open_facilities()), vec![0, 2]);

        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        DestroyOperator::best(1)
            .destroy(&mut solution, &problem, &mut rng)
            .unwrap();
        assert_eq!(sorted(solution.open_facilities()), vec![0, 4]);
    }

    #[test]
    fn test_worst_destroy_follows_direction() {
        let problem = problem(Direction::Maximize);
        let mut rng = create_rng(4);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        DestroyOperator::worst(1)
            .destroy(&mut solution, &problem, &mut rng)
            .unwrap();
        assert_eq!(sorted(solution.open_facilities()), vec![0, 4]);
    }

    #[test]
    fn test_destroy_too_many_is_violation() {
        let problem = problem(Direction::Minimize);
        let mut rng = create_rng(4);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        assert!(matches!(
            DestroyOperator::random(4).destroy(&mut solution, &problem, &mut rng),
            Err(FacilityError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_repair_restores_feasibility() {
        let problem = problem(Direction::Minimize);
        let mut rng = create_rng(21);
        for repair in [RepairOperator::Random, RepairOperator::LocalSearch] {
            for _ in 0..20 {
                let mut solution = FacilitySolution::from_facilities(&problem, vec![1, 3, 5]);
                DestroyOperator::random(2)
                    .destroy(&mut solution, &problem, &mut rng)
                    .unwrap();
                repair.repair(&mut solution, &problem, &mut rng).unwrap();

                assert!(solution.is_complete(&problem));
                assert_eq!(sorted(solution.open_facilities()).len(), 3);
                let mut unique = sorted(solution.open_facilities());
                unique.dedup();
                assert_eq!(unique.len(), 3);
                assert_eq!(
                    solution.objective(),
                    problem.evaluate(solution.open_facilities())
                );
            }
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(DestroyOperator::worst(2).to_string(), "worst_q(2)");
        assert_eq!(RepairOperator::LocalSearch.name(), "local_search_repair");
        assert_eq!(DestroyOperator::best(1).with_num_to_change(3).num_to_change(), 3);
    }
}
