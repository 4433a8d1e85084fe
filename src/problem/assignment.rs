//! Customer assignment, per-facility measures and objective aggregation.
//!
//! All functions here are pure: they read the cost matrix and return fresh
//! values. Objectives are always recomputed from scratch from an assignment,
//! never patched incrementally.

use super::types::{Aggregate, Measure};
use std::collections::BTreeMap;

/// Passes allowed for the greedy max-star heuristic before giving up.
const GREEDY_FAILSAFE: usize = 1000;

/// Map from open facility to its measure. Ordered by facility id so that
/// "first found" tie-breaking is deterministic.
pub type MeasureMap = BTreeMap<usize, i64>;

/// How customers are attached to open facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentRule {
    /// Every customer goes to its cheapest open facility.
    #[default]
    Nearest,
    /// Nearest assignment, then customers of the largest star are pushed to
    /// their next-closest facility while that lowers the largest star.
    GreedyMaxStar,
}

impl AssignmentRule {
    pub fn assign(&self, costs: &[Vec<i64>], facilities: &[usize]) -> Vec<usize> {
        match self {
            AssignmentRule::Nearest => assign(costs, facilities),
            AssignmentRule::GreedyMaxStar => greedy_max_star(costs, facilities),
        }
    }
}

/// Assigns every customer to its cheapest facility in `facilities`.
///
/// Ties go to the facility seen first in `facilities`. Returns an empty
/// vector when no facility is open.
pub fn assign(costs: &[Vec<i64>], facilities: &[usize]) -> Vec<usize> {
    let Some((&first, rest)) = facilities.split_first() else {
        return Vec::new();
    };
    costs
        .iter()
        .map(|row| {
            let mut best = first;
            let mut best_cost = row[first];
            for &fac in rest {
                if row[fac] < best_cost {
                    best = fac;
                    best_cost = row[fac];
                }
            }
            best
        })
        .collect()
}

/// Computes the measure of every facility that serves at least one customer.
pub fn measures_of(costs: &[Vec<i64>], assignment: &[usize], measure: Measure) -> MeasureMap {
    let mut measures = MeasureMap::new();
    for (customer, &fac) in assignment.iter().enumerate() {
        let cost = costs[customer][fac];
        measures
            .entry(fac)
            .and_modify(|m| match measure {
                Measure::Star => *m += cost,
                Measure::Radius => *m = (*m).max(cost),
                Measure::Ray => *m = (*m).min(cost),
            })
            .or_insert(cost);
    }
    measures
}

/// Combines a measure map into a single objective value.
///
/// `Max`/`Min` return the first extreme entry found; an empty map yields 0.
pub fn aggregate(measures: &MeasureMap, aggregate: Aggregate) -> i64 {
    match aggregate {
        Aggregate::Sum => measures.values().sum(),
        Aggregate::Max => extreme(measures, |a, b| a > b).map_or(0, |(_, v)| v),
        Aggregate::Min => extreme(measures, |a, b| a < b).map_or(0, |(_, v)| v),
    }
}

fn extreme(measures: &MeasureMap, replaces: impl Fn(i64, i64) -> bool) -> Option<(usize, i64)> {
    let mut iter = measures.iter().map(|(&f, &v)| (f, v));
    let first = iter.next()?;
    Some(iter.fold(first, |best, entry| {
        if replaces(entry.1, best.1) {
            entry
        } else {
            best
        }
    }))
}

/// Greedy reassignment that tries to shrink the largest star.
///
/// Starting from the nearest assignment, the most expensive customer of the
/// largest-star facility that can be moved to its next-closest open facility
/// without that facility's star reaching the current maximum is moved, and
/// the process repeats. Stops when no such move exists or after
/// `GREEDY_FAILSAFE` passes, in which case the best effort so far is returned.
pub fn greedy_max_star(costs: &[Vec<i64>], facilities: &[usize]) -> Vec<usize> {
    greedy_max_star_capped(costs, facilities, GREEDY_FAILSAFE)
}

fn greedy_max_star_capped(
    costs: &[Vec<i64>],
    facilities: &[usize],
    max_passes: usize,
) -> Vec<usize> {
    let mut assignment = assign(costs, facilities);
    if facilities.len() < 2 {
        return assignment;
    }
    let mut stars = measures_of(costs, &assignment, Measure::Star);

    for _ in 0..max_passes {
        let Some((max_fac, max_star)) = extreme(&stars, |a, b| a > b) else {
            return assignment;
        };

        let mut customers: Vec<usize> = (0..assignment.len())
            .filter(|&c| assignment[c] == max_fac)
            .collect();
        customers.sort_by(|&a, &b| costs[b][max_fac].cmp(&costs[a][max_fac]));

        let next_move = customers.iter().find_map(|&c| {
            if costs[c][max_fac] == 0 {
                return None;
            }
            let target = next_closest(&costs[c], facilities, max_fac)?;
            let target_star = stars.get(&target).copied().unwrap_or(0) + costs[c][target];
            (target_star < max_star).then_some((c, target))
        });

        let Some((customer, target)) = next_move else {
            return assignment;
        };
        assignment[customer] = target;
        if let Some(star) = stars.get_mut(&max_fac) {
            *star -= costs[customer][max_fac];
        }
        *stars.entry(target).or_insert(0) += costs[customer][target];
    }

    tracing::warn!(
        passes = max_passes,
        "greedy max-star assignment hit its failsafe; returning best effort"
    );
    assignment
}

/// Cheapest facility for a customer other than `skip`.
fn next_closest(row: &[i64], facilities: &[usize], skip: usize) -> Option<usize> {
    facilities
        .iter()
        .copied()
        .filter(|&f| f != skip)
        .fold(None, |best: Option<usize>, f| match best {
            Some(b) if row[b] <= row[f] => Some(b),
            _ => Some(f),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec<i64>> {
        vec![
            vec![0, 2, 5, 9],
            vec![2, 0, 4, 6],
            vec![5, 4, 0, 3],
            vec![9, 6, 3, 0],
        ]
    }

    #[test]
    fn test_assign_nearest_hand_computed() {
        let costs = square();
        let assignment = assign(&costs, &[0, 1]);
        // Customer 2: cost 5 to site 0, 4 to site 1. Customer 3: 9 vs 6.
        assert_eq!(assignment, vec![0, 1, 1, 1]);

        let stars = measures_of(&costs, &assignment, Measure::Star);
        assert_eq!(stars, MeasureMap::from([(0, 0), (1, 10)]));
        assert_eq!(aggregate(&stars, Aggregate::Sum), 10);
    }

    #[test]
    fn test_assign_ties_go_to_first_seen() {
        let costs = vec![vec![3, 3], vec![1, 1]];
        assert_eq!(assign(&costs, &[1, 0]), vec![1, 1]);
        assert_eq!(assign(&costs, &[0, 1]), vec![0, 0]);
    }

    #[test]
    fn test_assign_without_facilities() {
        assert!(assign(&square(), &[]).is_empty());
    }

    #[test]
    fn test_radius_and_ray() {
        let costs = square();
        let assignment = assign(&costs, &[0, 1]);
        let radii = measures_of(&costs, &assignment, Measure::Radius);
        assert_eq!(radii, MeasureMap::from([(0, 0), (1, 6)]));
        let rays = measures_of(&costs, &assignment, Measure::Ray);
        assert_eq!(rays, MeasureMap::from([(0, 0), (1, 0)]));

        assert_eq!(aggregate(&radii, Aggregate::Max), 6);
        assert_eq!(aggregate(&radii, Aggregate::Min), 0);
        assert_eq!(aggregate(&rays, Aggregate::Sum), 0);
    }

    #[test]
    fn test_facility_without_customers_has_no_measure() {
        // Site 2 is open but every customer is strictly cheaper elsewhere.
        let costs = vec![vec![0, 1, 9], vec![1, 0, 9], vec![1, 2, 5]];
        let assignment = assign(&costs, &[0, 1, 2]);
        assert_eq!(assignment, vec![0, 1, 0]);
        let stars = measures_of(&costs, &assignment, Measure::Star);
        assert!(!stars.contains_key(&2));
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let empty = MeasureMap::new();
        assert_eq!(aggregate(&empty, Aggregate::Max), 0);
        assert_eq!(aggregate(&empty, Aggregate::Sum), 0);
    }

    #[test]
    fn test_greedy_max_star_lowers_max_star() {
        // Three customers cluster around site 0; site 3 is a bit further.
        let costs = vec![
            vec![0, 8, 8, 3],
            vec![2, 0, 8, 3],
            vec![2, 8, 0, 3],
            vec![2, 8, 8, 0],
        ];
        let nearest = assign(&costs, &[0, 3]);
        let greedy = greedy_max_star(&costs, &[0, 3]);

        let nearest_max = aggregate(&measures_of(&costs, &nearest, Measure::Star), Aggregate::Max);
        let greedy_max = aggregate(&measures_of(&costs, &greedy, Measure::Star), Aggregate::Max);
        assert_eq!(nearest_max, 4);
        assert!(greedy_max <= nearest_max);
        assert_eq!(greedy_max, 3);
    }

    #[test]
    fn test_greedy_failsafe_returns_best_effort() {
        let costs = vec![
            vec![0, 9, 9, 9],
            vec![9, 0, 9, 9],
            vec![3, 4, 0, 9],
            vec![3, 4, 9, 0],
        ];
        // One move (customer 2 to site 1) settles it.
        assert_eq!(greedy_max_star(&costs, &[0, 1]), vec![0, 1, 1, 0]);

        assert_eq!(greedy_max_star_capped(&costs, &[0, 1], 0), assign(&costs, &[0, 1]));
        assert_eq!(greedy_max_star_capped(&costs, &[0, 1], 0), vec![0, 1, 0, 0]);
        assert_eq!(greedy_max_star_capped(&costs, &[0, 1], 1), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_greedy_single_facility_is_nearest() {
        let costs = square();
        assert_eq!(greedy_max_star(&costs, &[2]), assign(&costs, &[2]));
        assert_eq!(AssignmentRule::Nearest.assign(&costs, &[0, 1]), vec![0, 1, 1, 1]);
    }
}
