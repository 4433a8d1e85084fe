//! ALNS execution loop.

use super::config::AlnsConfig;
use super::pool::OperatorPool;
use super::solution::{FacilitySolution, VisitedSet};
use super::types::{DestroyOperator, FacilityOperator, RepairOperator};
use crate::error::FacilityError;
use crate::listener::{NoopListener, SearchListener};
use crate::problem::{Comparator, FacilityProblem};
use crate::pso::{NdpsoConfig, NdpsoRunner};
use crate::random::rng_from_seed;
use crate::result::SearchResult;
use rand::Rng;
use std::time::Instant;

/// How one ALNS iteration ended. The discriminant indexes
/// [`AlnsConfig::outcome_scores`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Rejected by the annealing test or already visited.
    NotAccepted = 0,
    /// Accepted and better than the best solution so far.
    NewGlobalBest = 1,
    /// Accepted and better than the current solution.
    AcceptedBetter = 2,
    /// Accepted although not better than the current solution.
    AcceptedWorse = 3,
}

impl Outcome {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_accepted(self) -> bool {
        self != Outcome::NotAccepted
    }
}

/// Temperature at which a solution `1 - control` times the initial objective
/// away is accepted with probability 0.5.
///
/// Returns the magnitude of `objective * (1 - control) / ln 0.5`, so the
/// temperature is non-negative in both directions.
pub fn starting_temperature(objective: i64, control: f64) -> f64 {
    (objective as f64 * (1.0 - control) / 0.5f64.ln()).abs()
}

/// Acceptance probability of a move with the given direction-oriented
/// improvement (positive is better).
///
/// At zero temperature only non-worsening moves are accepted.
pub fn acceptance_probability(improvement: i64, temperature: f64) -> f64 {
    if temperature > 0.0 {
        (improvement as f64 / temperature).exp()
    } else if improvement >= 0 {
        1.0
    } else {
        0.0
    }
}

/// Geometric cooling schedule.
#[derive(Debug, Clone, Copy)]
struct Annealing {
    temperature: f64,
    cooling_factor: f64,
}

impl Annealing {
    fn accepts<R: Rng>(&self, improvement: i64, rng: &mut R) -> bool {
        let u: f64 = rng.random_range(0.0..1.0);
        u <= acceptance_probability(improvement, self.temperature)
    }

    fn cool(&mut self) {
        self.temperature *= self.cooling_factor;
    }
}

/// Executes ALNS on a facility problem.
///
/// # Examples
///
/// ```
/// use u_facility::alns::{AlnsConfig, AlnsRunner};
/// use u_facility::listener::NoopListener;
/// use u_facility::problem::{Direction, FacilityProblem, ProblemType};
///
/// let costs: Vec<Vec<i64>> = (0..8)
///     .map(|i: i64| (0..8).map(|j: i64| (i - j).abs()).collect())
///     .collect();
/// let problem = FacilityProblem::new(costs, 2, ProblemType::default(), Direction::Minimize)?;
///
/// let config = AlnsConfig::default()
///     .with_max_iterations(200)
///     .with_initial_search(10, 5)
///     .with_seed(42);
/// let result = AlnsRunner::new(config).run(&problem, &mut NoopListener)?;
/// assert_eq!(result.open_facilities.len(), 2);
/// # Ok::<(), u_facility::FacilityError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlnsRunner {
    config: AlnsConfig,
}

impl AlnsRunner {
    pub const NAME: &'static str = "ALNS";

    pub fn new(config: AlnsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlnsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AlnsConfig {
        &mut self.config
    }

    /// Runs ALNS with a generator built from the configured seed.
    pub fn run<L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        let mut rng = rng_from_seed(self.config.seed);
        self.run_with_rng(problem, &mut rng, listener)
    }

    /// Runs ALNS drawing from `rng`.
    ///
    /// Operator weights, the visited set and the temperature all start
    /// fresh on every call.
    #[tracing::instrument(level = "debug", name = "ALNS", skip_all, fields(problem = %problem.name()))]
    pub fn run_with_rng<R: Rng, L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        let config = &self.config;
        config.validate()?;
        if config.destroy_size() > problem.num_facilities() {
            return Err(FacilityError::parameter(
                "destroy_size",
                format!(
                    "cannot close {} of {} facilities",
                    config.destroy_size(),
                    problem.num_facilities()
                ),
            ));
        }

        let start = Instant::now();
        listener.on_run_start(
            Self::NAME,
            problem.name(),
            problem.problem_type(),
            problem.direction(),
        );

        let initial = self.initial_solution(problem, rng)?;
        let mut search = AlnsSearch::new(config, problem, initial)?;
        tracing::debug!(
            objective = search.current.objective(),
            temperature = search.annealing.temperature,
            "initial solution"
        );

        for _ in 0..config.max_iterations {
            let outcome = search.step(rng)?;
            listener.on_iteration(search.iteration, outcome, search.best.objective());
        }

        let best = &search.best;
        let result = SearchResult {
            elapsed_seconds: start.elapsed().as_secs_f64(),
            objective: best.objective(),
            open_facilities: best.open_facilities().to_vec(),
            customer_assignment: best.customer_assignment().to_vec(),
            problem_type: problem.problem_type(),
            direction: problem.direction(),
            iterations: search.iteration,
        };
        tracing::debug!(
            objective = result.objective,
            elapsed = result.elapsed_seconds,
            visited = search.visited.len(),
            temperature = search.annealing.temperature,
            "search finished"
        );
        listener.on_run_end(&result);
        Ok(result)
    }

    /// Short swarm run that seeds the search.
    fn initial_solution<R: Rng>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<FacilitySolution, FacilityError> {
        let swarm = NdpsoRunner::new(
            NdpsoConfig::default()
                .with_swarm_size(self.config.initial_swarm_size)
                .with_max_iterations(self.config.initial_search_iterations),
        );
        let initial = swarm.run_with_rng(problem, rng, &mut NoopListener)?;
        Ok(FacilitySolution::from_facilities(
            problem,
            initial.open_facilities,
        ))
    }
}

/// State of one ALNS run.
///
/// Pools start with every weight at 1, the visited set starts empty and the
/// temperature starts at [`starting_temperature`] of the initial solution.
struct AlnsSearch<'a> {
    config: &'a AlnsConfig,
    problem: &'a FacilityProblem,
    comparator: Comparator,
    destroy_pool: OperatorPool<DestroyOperator>,
    repair_pool: OperatorPool<RepairOperator>,
    current: FacilitySolution,
    best: FacilitySolution,
    visited: VisitedSet,
    annealing: Annealing,
    iteration: usize,
}

impl<'a> AlnsSearch<'a> {
    fn new(
        config: &'a AlnsConfig,
        problem: &'a FacilityProblem,
        initial: FacilitySolution,
    ) -> Result<Self, FacilityError> {
        Ok(Self {
            config,
            problem,
            comparator: problem.comparator(),
            destroy_pool: OperatorPool::new("destroy", config.destroy_operators.clone())?,
            repair_pool: OperatorPool::new("repair", config.repair_operators.clone())?,
            annealing: Annealing {
                temperature: starting_temperature(initial.objective(), config.start_temp_control),
                cooling_factor: config.cooling_factor,
            },
            best: initial.clone(),
            current: initial,
            visited: VisitedSet::new(),
            iteration: 0,
        })
    }

    /// One destroy/repair/accept cycle.
    ///
    /// Cools once and rewards both chosen operators with the outcome's
    /// score whatever the outcome; reacts the weights at segment ends.
    fn step<R: Rng>(&mut self, rng: &mut R) -> Result<Outcome, FacilityError> {
        self.iteration += 1;
        let d_idx = self.destroy_pool.select(rng);
        let r_idx = self.repair_pool.select(rng);
        let destroy = *self.destroy_pool.use_operator(d_idx);
        let repair = *self.repair_pool.use_operator(r_idx);

        let mut candidate = self.current.clone();
        destroy.destroy(&mut candidate, self.problem, rng)?;
        repair.repair(&mut candidate, self.problem, rng)?;

        let outcome = accept(
            &self.comparator,
            &mut self.current,
            &mut self.best,
            candidate,
            &mut self.visited,
            &self.annealing,
            rng,
        );
        self.annealing.cool();

        let score = self.config.outcome_scores[outcome.index()];
        self.destroy_pool.reward(d_idx, score);
        self.repair_pool.reward(r_idx, score);

        tracing::trace!(
            iteration = self.iteration,
            destroy = destroy.name(),
            repair = repair.name(),
            ?outcome,
            current = self.current.objective(),
            best = self.best.objective(),
            "iteration"
        );

        if self.iteration % self.config.segment_length == 0 {
            self.destroy_pool.end_segment(self.config.reaction_factor);
            self.repair_pool.end_segment(self.config.reaction_factor);
            tracing::debug!(
                iteration = self.iteration,
                destroy = %self.destroy_pool.describe(),
                repair = %self.repair_pool.describe(),
                "operator weights"
            );
        }
        Ok(outcome)
    }
}

/// Applies the visited guard and the annealing test; on acceptance moves
/// `current` (and `best` when improved) to `candidate`.
fn accept<R: Rng>(
    comparator: &Comparator,
    current: &mut FacilitySolution,
    best: &mut FacilitySolution,
    candidate: FacilitySolution,
    visited: &mut VisitedSet,
    annealing: &Annealing,
    rng: &mut R,
) -> Outcome {
    let key = candidate.key();
    if visited.contains(&key) {
        return Outcome::NotAccepted;
    }
    let improvement = comparator.improvement(current.objective(), candidate.objective());
    if !annealing.accepts(improvement, rng) {
        return Outcome::NotAccepted;
    }

    visited.insert(key);
    let outcome = if comparator.better_than(candidate.objective(), best.objective()) {
        *best = candidate.clone();
        Outcome::NewGlobalBest
    } else if improvement > 0 {
        Outcome::AcceptedBetter
    } else {
        Outcome::AcceptedWorse
    };
    *current = candidate;
    outcome
}
