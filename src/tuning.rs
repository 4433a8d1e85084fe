//! Parameter tuning and batch runs on top of [`Optimizer`].
//!
//! - [`GridSearch`]: sweep one parameter over a range, keep the value with
//!   the best average objective
//! - [`sweep_problem_types`]: rerun an engine under several problem types
//! - [`run_independent`]: one isolated run per seed, on rayon's pool with
//!   the `parallel` feature

use crate::error::FacilityError;
use crate::listener::{NoopListener, SearchListener};
use crate::optimizer::Optimizer;
use crate::problem::{Comparator, FacilityProblem, ProblemType};
use crate::random::{create_rng, rng_from_seed};
use crate::result::SearchResult;
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Exhaustive search over one numeric parameter.
///
/// Every value `lower + i * step` up to `upper` is set on the engine and
/// run `repeats` times; the value with the best average objective (per the
/// problem's direction, earlier value on ties) is left set on the engine.
///
/// # Examples
///
/// ```
/// use u_facility::pso::{NdpsoConfig, NdpsoRunner};
/// use u_facility::listener::NoopListener;
/// use u_facility::problem::{Direction, FacilityProblem, ProblemType};
/// use u_facility::tuning::GridSearch;
///
/// let costs: Vec<Vec<i64>> = (0..6)
///     .map(|i: i64| (0..6).map(|j: i64| (i - j).abs()).collect())
///     .collect();
/// let problem = FacilityProblem::new(costs, 2, ProblemType::default(), Direction::Minimize)?;
/// let mut engine = NdpsoRunner::new(NdpsoConfig::default().with_swarm_size(5).with_max_iterations(10));
///
/// let report = GridSearch::new("social", 0.2, 0.8, 0.3)
///     .with_repeats(2)
///     .with_seed(7)
///     .run(&mut engine, &problem, &mut NoopListener)?;
/// assert_eq!(report.averages.len(), 3);
/// assert_eq!(engine.config().social, report.best_value);
/// # Ok::<(), u_facility::FacilityError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearch {
    key: String,
    lower: f64,
    upper: f64,
    step: f64,
    repeats: usize,
    seed: Option<u64>,
}

/// Averages collected by a [`GridSearch`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridReport {
    pub key: String,
    /// `(value, average objective)` in sweep order.
    pub averages: Vec<(f64, f64)>,
    pub best_value: f64,
    pub best_average: f64,
}

impl GridSearch {
    pub fn new(key: impl Into<String>, lower: f64, upper: f64, step: f64) -> Self {
        Self {
            key: key.into(),
            lower,
            upper,
            step,
            repeats: 5,
            seed: None,
        }
    }

    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Seeds the generator shared by every run of the sweep.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Values visited by the sweep, in order.
    pub fn values(&self) -> Result<Vec<f64>, FacilityError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(FacilityError::parameter(
                "step",
                format!("must be positive, got {}", self.step),
            ));
        }
        if !(self.lower.is_finite() && self.upper.is_finite()) || self.lower > self.upper {
            return Err(FacilityError::parameter(
                "lower",
                format!("empty range [{}, {}]", self.lower, self.upper),
            ));
        }
        let tolerance = self.step * 1e-9;
        let values = (0..)
            .map(|i| self.lower + i as f64 * self.step)
            .take_while(|v| *v <= self.upper + tolerance)
            .collect();
        Ok(values)
    }

    /// Runs the sweep with a generator built from the configured seed.
    pub fn run<O: Optimizer, L: SearchListener + ?Sized>(
        &self,
        optimizer: &mut O,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<GridReport, FacilityError> {
        let mut rng = rng_from_seed(self.seed);
        self.run_with_rng(optimizer, problem, &mut rng, listener)
    }

    /// Runs the sweep drawing every run from `rng`.
    ///
    /// The engine keeps the best value on success. If any run fails the
    /// error is returned and the parameter holds whichever value was being
    /// tried.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %self.key))]
    pub fn run_with_rng<O: Optimizer, R: Rng, L: SearchListener + ?Sized>(
        &self,
        optimizer: &mut O,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<GridReport, FacilityError> {
        if self.repeats == 0 {
            return Err(FacilityError::parameter("repeats", "must be positive"));
        }
        let comparator = problem.comparator();
        let mut averages = Vec::new();
        for value in self.values()? {
            optimizer.set_parameter(&self.key, value)?;
            let mut total = 0i64;
            for _ in 0..self.repeats {
                total += optimizer.optimize_with_rng(problem, rng, listener)?.objective;
            }
            let average = total as f64 / self.repeats as f64;
            tracing::debug!(value, average, "grid point");
            averages.push((value, average));
        }

        let (best_value, best_average) = best_average(&comparator, &averages).ok_or_else(|| {
            FacilityError::parameter(self.key.clone(), "grid search visited no values")
        })?;
        optimizer.set_parameter(&self.key, best_value)?;
        tracing::info!(key = %self.key, best_value, best_average, "grid search finished");

        Ok(GridReport {
            key: self.key.clone(),
            averages,
            best_value,
            best_average,
        })
    }
}

fn best_average(comparator: &Comparator, averages: &[(f64, f64)]) -> Option<(f64, f64)> {
    averages.iter().copied().reduce(|best, next| {
        if comparator.better_than(next.1, best.1) {
            next
        } else {
            best
        }
    })
}

/// Runs `optimizer` `runs` times under each problem type.
///
/// Results are returned in type order, then run order. The engine reports
/// each run's start and end to `listener`.
pub fn sweep_problem_types<O: Optimizer, R: Rng, L: SearchListener + ?Sized>(
    optimizer: &O,
    problem: &FacilityProblem,
    problem_types: &[ProblemType],
    runs: usize,
    rng: &mut R,
    listener: &mut L,
) -> Result<Vec<SearchResult>, FacilityError> {
    let mut results = Vec::with_capacity(problem_types.len() * runs);
    for &problem_type in problem_types {
        let variant = problem.with_problem_type(problem_type);
        for _ in 0..runs {
            results.push(optimizer.optimize_with_rng(&variant, rng, listener)?);
        }
    }
    Ok(results)
}

/// One run per seed, each with its own generator and search state.
///
/// Results keep the order of `seeds`. With the `parallel` feature the runs
/// execute on rayon's global pool.
pub fn run_independent<O: Optimizer>(
    optimizer: &O,
    problem: &FacilityProblem,
    seeds: &[u64],
) -> Result<Vec<SearchResult>, FacilityError> {
    let single = |seed: &u64| {
        let mut rng = create_rng(*seed);
        optimizer.optimize_with_rng(problem, &mut rng, &mut NoopListener)
    };

    #[cfg(feature = "parallel")]
    let results = seeds.par_iter().map(single).collect();
    #[cfg(not(feature = "parallel"))]
    let results = seeds.iter().map(single).collect();

    results
}

/// Best of `results` according to their own direction; ties keep the first.
pub fn best_result(results: &[SearchResult]) -> Option<&SearchResult> {
    results.iter().reduce(|best, next| {
        if Comparator::new(best.direction).better_than(next.objective, best.objective) {
            next
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alns::{AlnsConfig, AlnsRunner};
    use crate::problem::{Aggregate, Direction, Measure};
    use crate::pso::{NdpsoConfig, NdpsoRunner};

    fn line_problem(direction: Direction) -> FacilityProblem {
        let costs = (0..10)
            .map(|i: i64| (0..10).map(|j: i64| (i - j).abs()).collect())
            .collect();
        FacilityProblem::new(
            costs,
            2,
            ProblemType::new(Aggregate::Sum, Measure::Star),
            direction,
        )
        .unwrap()
    }

    fn small_pso() -> NdpsoRunner {
        NdpsoRunner::new(
            NdpsoConfig::default()
                .with_swarm_size(6)
                .with_max_iterations(15),
        )
    }

    #[derive(Default)]
    struct Counter {
        starts: Vec<ProblemType>,
        ends: usize,
    }

    impl SearchListener for Counter {
        fn on_run_start(
            &mut self,
            _algorithm: &str,
            _problem: &str,
            problem_type: ProblemType,
            _direction: Direction,
        ) {
            self.starts.push(problem_type);
        }

        fn on_run_end(&mut self, _result: &SearchResult) {
            self.ends += 1;
        }
    }

    #[test]
    fn test_grid_values() {
        let grid = GridSearch::new("inertia", 0.1, 0.5, 0.1);
        let values = grid.values().unwrap();
        assert_eq!(values.len(), 5);
        assert!((values[4] - 0.5).abs() < 1e-12);

        assert!(GridSearch::new("inertia", 0.1, 0.5, 0.0).values().is_err());
        assert!(GridSearch::new("inertia", 0.6, 0.5, 0.1).values().is_err());
        assert_eq!(GridSearch::new("inertia", 0.5, 0.5, 0.1).values().unwrap(), vec![0.5]);
    }

    #[test]
    fn test_grid_search_sets_best_value() {
        let problem = line_problem(Direction::Minimize);
        let mut engine = small_pso();
        let mut counter = Counter::default();
        let report = GridSearch::new("cognitive", 0.0, 1.0, 0.5)
            .with_repeats(3)
            .with_seed(5)
            .run(&mut engine, &problem, &mut counter)
            .unwrap();

        assert_eq!(report.key, "cognitive");
        assert_eq!(report.averages.len(), 3);
        assert_eq!(counter.starts.len(), 9);
        assert_eq!(counter.ends, 9);

        let minimum = report
            .averages
            .iter()
            .map(|(_, avg)| *avg)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(report.best_average, minimum);
        let first_best = report
            .averages
            .iter()
            .find(|(_, avg)| *avg == minimum)
            .unwrap()
            .0;
        assert_eq!(report.best_value, first_best);
        assert_eq!(engine.config().cognitive, report.best_value);
    }

    #[test]
    fn test_best_average_ties_keep_earlier() {
        let averages = [(0.1, 5.0), (0.2, 3.0), (0.3, 3.0), (0.4, 9.0)];
        let min = Comparator::new(Direction::Minimize);
        let max = Comparator::new(Direction::Maximize);
        assert_eq!(best_average(&min, &averages), Some((0.2, 3.0)));
        assert_eq!(best_average(&max, &averages), Some((0.4, 9.0)));
        assert_eq!(best_average(&min, &[]), None);
    }

    #[test]
    fn test_grid_search_unknown_key() {
        let problem = line_problem(Direction::Minimize);
        let mut engine = small_pso();
        let result = GridSearch::new("temperature", 0.0, 1.0, 0.5).run(
            &mut engine,
            &problem,
            &mut NoopListener,
        );
        assert!(matches!(result, Err(FacilityError::InvalidParameter { .. })));
    }

    #[test]
    fn test_sweep_problem_types() {
        let problem = line_problem(Direction::Minimize);
        let types = [
            ProblemType::new(Aggregate::Sum, Measure::Star),
            ProblemType::new(Aggregate::Max, Measure::Radius),
        ];
        let mut counter = Counter::default();
        let mut rng = create_rng(1);
        let results =
            sweep_problem_types(&small_pso(), &problem, &types, 2, &mut rng, &mut counter).unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(counter.starts, vec![types[0], types[0], types[1], types[1]]);
        assert_eq!(counter.ends, 4);
        assert!(results[..2].iter().all(|r| r.problem_type == types[0]));
        assert!(results[2..].iter().all(|r| r.problem_type == types[1]));
    }

    #[test]
    fn test_run_independent_is_reproducible() {
        let problem = line_problem(Direction::Minimize);
        let engine = AlnsRunner::new(
            AlnsConfig::default()
                .with_max_iterations(80)
                .with_initial_search(4, 2),
        );
        let seeds = [1, 2, 3, 4];
        let a = run_independent(&engine, &problem, &seeds).unwrap();
        let b = run_independent(&engine, &problem, &seeds).unwrap();
        assert_eq!(a.len(), 4);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.objective, y.objective);
            assert_eq!(x.open_facilities, y.open_facilities);
        }

        let best = best_result(&a).unwrap();
        assert!(a.iter().all(|r| best.objective <= r.objective));
    }
}
