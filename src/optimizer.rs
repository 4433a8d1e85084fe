//! The surface shared by both engines.

use crate::alns::AlnsRunner;
use crate::error::FacilityError;
use crate::listener::SearchListener;
use crate::problem::FacilityProblem;
use crate::pso::NdpsoRunner;
use crate::result::SearchResult;
use rand::Rng;

/// A configurable search engine over facility problems.
///
/// Tuning helpers are written against this trait, so they drive ALNS and
/// NDPSO alike.
pub trait Optimizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Flat `(key, value)` report of the engine's numeric parameters.
    fn parameters(&self) -> Vec<(&'static str, f64)>;

    /// Sets one parameter by its report key.
    fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), FacilityError>;

    /// Runs once with a generator built from the configured seed.
    fn optimize<L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError>;

    /// Runs once drawing from `rng`.
    fn optimize_with_rng<R: Rng, L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError>;
}

impl Optimizer for AlnsRunner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.config().parameters()
    }

    fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), FacilityError> {
        self.config_mut().set_parameter(key, value)
    }

    fn optimize<L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        self.run(problem, listener)
    }

    fn optimize_with_rng<R: Rng, L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        self.run_with_rng(problem, rng, listener)
    }
}

impl Optimizer for NdpsoRunner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.config().parameters()
    }

    fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), FacilityError> {
        self.config_mut().set_parameter(key, value)
    }

    fn optimize<L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        self.run(problem, listener)
    }

    fn optimize_with_rng<R: Rng, L: SearchListener + ?Sized>(
        &self,
        problem: &FacilityProblem,
        rng: &mut R,
        listener: &mut L,
    ) -> Result<SearchResult, FacilityError> {
        self.run_with_rng(problem, rng, listener)
    }
}

/// Converts a parameter value into a count.
pub(crate) fn parameter_count(key: &str, value: f64) -> Result<usize, FacilityError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(FacilityError::parameter(
            key,
            format!("must be a non-negative whole number, got {value}"),
        ));
    }
    Ok(value as usize)
}
