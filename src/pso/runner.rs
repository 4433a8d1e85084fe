//! NDPSO execution loop.

use super::config::NdpsoConfig;
use super::particle::{Coefficients, Particle, Swarm};
use crate::error::FacilityError;
use crate::listener::SearchListener;
use crate::problem::FacilityProblem;
use crate::random::rng_from_seed;
use crate::result::SearchResult;
use rand::Rng;
use std::time::Instant;

/// Executes the discrete particle swarm.
#[derive(Debug, Clone, Default)]
pub struct NdpsoRunner {
    config: NdpsoConfig,
}

impl NdpsoRunner {
    pub const NAME: &'static str = "NDPSO";

    pub fn new(config: NdpsoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NdpsoConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NdpsoConfig {
        &mut self.config
    }

    /// Runs the swarm with a generator built from the configured seed.
    pub fn run<L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        let mut rng = rng_from_seed(self.config.seed);
        self.run_with_rng(problem, &mut rng, listener)
    }

    /// Runs the swarm drawing from `rng`.
    ///
    /// The inertia coefficient restarts from its configured value on every
    /// run, so a runner can be reused.
    #[tracing::instrument(level = "debug", name = "NDPSO", skip_all, fields(problem = %problem.name()))]
    pub fn run_with_rng<R: Rng, L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        self.config.validate()?;
        let config = &self.config;
        let comparator = problem.comparator();
        let start = Instant::now();

        listener.on_run_start(
            Self::NAME,
            problem.name(),
            problem.problem_type(),
            problem.direction(),
        );

        let mut swarm = Swarm::random(config.swarm_size, problem, rng)?;
        let mut global_best = best_of(&swarm, problem)?;
        let mut universal_best = global_best.clone();

        let mut coefficients = Coefficients {
            inertia: config.inertia,
            cognitive: config.cognitive,
            social: config.social,
        };

        for iteration in 1..=config.max_iterations {
            coefficients.inertia *= config.inertial_discount;

            swarm.update_all(&global_best, coefficients, problem, rng)?;

            global_best = best_of(&swarm, problem)?;
            if comparator.better_than(global_best.fitness(), universal_best.fitness()) {
                tracing::trace!(iteration, fitness = global_best.fitness(), "new universal best");
                universal_best = global_best.clone();
            }

            listener.on_particle_update(&universal_best, iteration);
        }

        let result = SearchResult {
            elapsed_seconds: start.elapsed().as_secs_f64(),
            objective: universal_best.fitness(),
            open_facilities: universal_best.position().to_vec(),
            customer_assignment: universal_best.customer_assignment(problem),
            problem_type: problem.problem_type(),
            direction: problem.direction(),
            iterations: config.max_iterations,
        };
        tracing::debug!(
            objective = result.objective,
            elapsed = result.elapsed_seconds,
            "swarm finished"
        );
        listener.on_run_end(&result);
        Ok(result)
    }
}

fn best_of(swarm: &Swarm, problem: &FacilityProblem) -> Result<Particle, FacilityError> {
    swarm
        .global_best(&problem.comparator())
        .cloned()
        .ok_or_else(|| FacilityError::parameter("swarm_size", "must be positive"))
}
