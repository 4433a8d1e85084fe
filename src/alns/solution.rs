//! The ALNS solution representation and the visited-solution guard.

use crate::error::FacilityError;
use crate::problem::{FacilityProblem, MeasureMap};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Open facility set with its cached assignment and objective.
///
/// Between a destroy and the following repair the set may hold fewer than
/// `p` facilities; `unassigned_slots` counts how many are missing. The
/// cached assignment and objective are only meaningful when the solution
/// is complete, and are refreshed by [`recompute`](Self::recompute).
#[derive(Debug, Clone, PartialEq)]
pub struct FacilitySolution {
    open_facilities: Vec<usize>,
    customer_assignment: Vec<usize>,
    objective: i64,
    unassigned_slots: usize,
}

impl FacilitySolution {
    /// Builds a complete solution from a facility set and evaluates it.
    pub fn from_facilities(problem: &FacilityProblem, facilities: Vec<usize>) -> Self {
        let mut solution = Self {
            open_facilities: facilities,
            customer_assignment: Vec::new(),
            objective: 0,
            unassigned_slots: 0,
        };
        solution.recompute(problem);
        solution
    }

    pub fn open_facilities(&self) -> &[usize] {
        &self.open_facilities
    }

    pub fn customer_assignment(&self) -> &[usize] {
        &self.customer_assignment
    }

    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Facilities that must be inserted before the solution is valid again.
    pub fn unassigned_slots(&self) -> usize {
        self.unassigned_slots
    }

    /// `true` when no slot is pending and exactly `p` facilities are open.
    pub fn is_complete(&self, problem: &FacilityProblem) -> bool {
        self.unassigned_slots == 0 && self.open_facilities.len() == problem.num_facilities()
    }

    /// Reassigns customers and recomputes the objective from scratch.
    pub fn recompute(&mut self, problem: &FacilityProblem) {
        self.customer_assignment = problem.assign(&self.open_facilities);
        self.objective = problem.objective(&self.customer_assignment);
    }

    /// Measure of every facility in the cached assignment.
    pub fn measures(&self, problem: &FacilityProblem) -> MeasureMap {
        problem.measures(&self.customer_assignment)
    }

    /// Orders open facilities from most to least favorable measure.
    ///
    /// Facilities without customers have no measure and go last; ties are
    /// broken by facility id.
    pub fn sort_by_measure(&mut self, problem: &FacilityProblem) {
        let measures = self.measures(problem);
        let comparator = problem.comparator();
        self.open_facilities.sort_by(|a, b| {
            let by_measure = match (measures.get(a), measures.get(b)) {
                (Some(x), Some(y)) => comparator.ordering(x, y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_measure.then(a.cmp(b))
        });
    }

    /// Closes the facility at `index`, opening one pending slot.
    pub fn remove_at(&mut self, index: usize) -> Result<usize, FacilityError> {
        if index >= self.open_facilities.len() {
            return Err(FacilityError::InvariantViolation(format!(
                "cannot close slot {index} of {} open facilities",
                self.open_facilities.len()
            )));
        }
        self.unassigned_slots += 1;
        Ok(self.open_facilities.remove(index))
    }

    /// Opens `facility` into a pending slot.
    pub fn insert(&mut self, facility: usize) -> Result<(), FacilityError> {
        if self.unassigned_slots == 0 {
            return Err(FacilityError::InvariantViolation(format!(
                "no pending slot for facility {facility}"
            )));
        }
        if self.open_facilities.contains(&facility) {
            return Err(FacilityError::InvariantViolation(format!(
                "facility {facility} is already open"
            )));
        }
        self.open_facilities.push(facility);
        self.unassigned_slots -= 1;
        Ok(())
    }

    /// Order-independent identity of the open facility set.
    pub fn key(&self) -> SolutionKey {
        let mut facilities = self.open_facilities.clone();
        facilities.sort_unstable();
        SolutionKey(facilities)
    }
}

/// Canonical (sorted) facility set used to detect revisits.
///
/// Two solutions share a key exactly when they open the same set, whatever
/// the order of their facilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolutionKey(Vec<usize>);

impl SolutionKey {
    pub fn facilities(&self) -> &[usize] {
        &self.0
    }
}

/// Solutions accepted during one run.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    keys: HashSet<SolutionKey>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &SolutionKey) -> bool {
        self.keys.contains(key)
    }

    /// Records `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: SolutionKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Aggregate, Direction, Measure, ProblemType};

    fn problem(ty: ProblemType, direction: Direction) -> FacilityProblem {
        let costs = vec![
            vec![0, 2, 5, 9, 7],
            vec![2, 0, 4, 6, 8],
            vec![5, 4, 0, 3, 6],
            vec![9, 6, 3, 0, 2],
            vec![7, 8, 6, 2, 0],
        ];
        FacilityProblem::new(costs, 3, ty, direction).unwrap()
    }

    fn sum_star() -> ProblemType {
        ProblemType::new(Aggregate::Sum, Measure::Star)
    }

    #[test]
    fn test_from_facilities_evaluates() {
        let problem = problem(sum_star(), Direction::Minimize);
        let solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        assert_eq!(solution.customer_assignment(), &[0, 0, 2, 4, 4]);
        assert_eq!(solution.objective(), 4);
        assert!(solution.is_complete(&problem));
    }

    #[test]
    fn test_key_ignores_order() {
        let problem = problem(sum_star(), Direction::Minimize);
        let a = FacilitySolution::from_facilities(&problem, vec![4, 0, 2]);
        let b = FacilitySolution::from_facilities(&problem, vec![2, 4, 0]);
        let c = FacilitySolution::from_facilities(&problem, vec![2, 4, 1]);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(a.key().facilities(), &[0, 2, 4]);
    }

    #[test]
    fn test_remove_and_insert_track_slots() {
        let problem = problem(sum_star(), Direction::Minimize);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 2, 4]);
        assert_eq!(solution.remove_at(1).unwrap(), 2);
        assert_eq!(solution.unassigned_slots(), 1);
        assert!(!solution.is_complete(&problem));

        assert!(solution.insert(0).is_err());
        solution.insert(3).unwrap();
        assert!(solution.insert(1).is_err());
        assert!(solution.is_complete(&problem));
        assert!(solution.remove_at(7).is_err());
    }

    #[test]
    fn test_sort_by_measure_minimize() {
        let problem = problem(sum_star(), Direction::Minimize);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![4, 0, 2]);
        // Stars: 0 -> 2 (customers 0, 1), 2 -> 0, 4 -> 2 (customers 3, 4).
        solution.sort_by_measure(&problem);
        assert_eq!(solution.open_facilities(), &[2, 0, 4]);
    }

    #[test]
    fn test_sort_by_measure_maximize() {
        let problem = problem(sum_star(), Direction::Maximize);
        let mut solution = FacilitySolution::from_facilities(&problem, vec![0, 1, 3]);
        // Stars: 0 -> 0, 1 -> 0, 3 -> 5 (customers 2, 3, 4).
        solution.sort_by_measure(&problem);
        assert_eq!(solution.open_facilities(), &[3, 0, 1]);
    }

    #[test]
    fn test_sort_by_measure_puts_idle_facility_last() {
        let costs = vec![
            vec![0, 5, 5, 100],
            vec![5, 0, 5, 100],
            vec![5, 5, 0, 100],
            vec![1, 5, 5, 100],
        ];
        for direction in [Direction::Minimize, Direction::Maximize] {
            let problem = FacilityProblem::new(costs.clone(), 2, sum_star(), direction).unwrap();
            let mut solution = FacilitySolution::from_facilities(&problem, vec![3, 0]);
            assert_eq!(solution.customer_assignment(), &[0, 0, 0, 0]);
            solution.sort_by_measure(&problem);
            assert_eq!(solution.open_facilities(), &[0, 3]);
        }
    }

    #[test]
    fn test_visited_set() {
        let problem = problem(sum_star(), Direction::Minimize);
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        let key = FacilitySolution::from_facilities(&problem, vec![1, 3, 4]).key();
        assert!(visited.insert(key.clone()));
        assert!(!visited.insert(key.clone()));
        assert!(visited.contains(&key));
        assert_eq!(visited.len(), 1);
    }
}
