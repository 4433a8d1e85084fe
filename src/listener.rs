//! Progress notifications emitted by the engines.
//!
//! Listeners are called synchronously on the search thread, so a slow
//! listener slows the search down. All methods default to no-ops.

use crate::alns::Outcome;
use crate::problem::{Direction, ProblemType};
use crate::pso::Particle;
use crate::result::SearchResult;

/// Receives run and progress events from an engine.
pub trait SearchListener {
    /// A run is about to start.
    fn on_run_start(
        &mut self,
        _algorithm: &str,
        _problem: &str,
        _problem_type: ProblemType,
        _direction: Direction,
    ) {
    }

    /// A run finished with `result`.
    fn on_run_end(&mut self, _result: &SearchResult) {}

    /// One swarm iteration finished; `best` is the best particle seen so far.
    fn on_particle_update(&mut self, _best: &Particle, _iteration: usize) {}

    /// One ALNS destroy/repair iteration finished.
    fn on_iteration(&mut self, _iteration: usize, _outcome: Outcome, _best_objective: i64) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl SearchListener for NoopListener {}

/// Forwards events to `tracing`: run boundaries at `info`, progress at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SearchListener for TracingListener {
    fn on_run_start(
        &mut self,
        algorithm: &str,
        problem: &str,
        problem_type: ProblemType,
        direction: Direction,
    ) {
        tracing::info!(%algorithm, %problem, %problem_type, %direction, "run started");
    }

    fn on_run_end(&mut self, result: &SearchResult) {
        tracing::info!(
            objective = result.objective,
            elapsed = result.elapsed_seconds,
            facilities = ?result.open_facilities,
            "run finished"
        );
    }

    fn on_particle_update(&mut self, best: &Particle, iteration: usize) {
        tracing::trace!(iteration, fitness = best.fitness(), "swarm iteration");
    }

    fn on_iteration(&mut self, iteration: usize, outcome: Outcome, best_objective: i64) {
        tracing::trace!(iteration, ?outcome, best_objective, "alns iteration");
    }
}
