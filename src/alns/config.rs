//! ALNS configuration.

use super::types::{DestroyOperator, RepairOperator};
use crate::error::FacilityError;
use crate::optimizer::parameter_count;

/// Configuration for the ALNS engine.
///
/// # Scoring
///
/// Each iteration ends in one of four outcomes, indexed as in
/// `outcome_scores`: not accepted, new global best, accepted and better
/// than the current solution, accepted but worse. The chosen destroy and
/// repair operators both receive the outcome's score. Every
/// `segment_length` iterations each operator used during the segment has
/// its weight smoothed toward its average score:
///
/// `w' = w * (1 - reaction_factor) + reaction_factor * score / uses`
///
/// # Acceptance
///
/// Simulated annealing. The starting temperature is chosen so that a
/// solution `start_temp_control` worse than the initial one is accepted
/// with probability 0.5; it then decays by `cooling_factor` every iteration.
///
/// # Examples
///
/// ```
/// use u_facility::alns::AlnsConfig;
///
/// let config = AlnsConfig::default()
///     .with_max_iterations(5000)
///     .with_segment_length(50)
///     .with_rewards(3.0, 15.0, 24.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlnsConfig {
    /// Number of destroy/repair iterations.
    pub max_iterations: usize,

    /// Iterations between operator weight updates.
    pub segment_length: usize,

    /// Weight smoothing factor, in (0, 1).
    pub reaction_factor: f64,

    /// Geometric cooling factor, in (0, 1).
    pub cooling_factor: f64,

    /// Relative worsening accepted with probability 0.5 at the start, in (0, 1).
    pub start_temp_control: f64,

    /// Scores for not accepted, new best, accepted better, accepted worse.
    pub outcome_scores: [f64; 4],

    /// Destroy pool, in selection order.
    pub destroy_operators: Vec<DestroyOperator>,

    /// Repair pool, in selection order.
    pub repair_operators: Vec<RepairOperator>,

    /// Swarm iterations spent building the initial solution.
    pub initial_search_iterations: usize,

    /// Swarm size used to build the initial solution.
    pub initial_swarm_size: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25000,
            segment_length: 100,
            reaction_factor: 0.8,
            cooling_factor: 0.99985,
            start_temp_control: 0.4,
            outcome_scores: [0.0, 3.0, 15.0, 24.0],
            destroy_operators: vec![
                DestroyOperator::random(1),
                DestroyOperator::best(1),
                DestroyOperator::worst(1),
            ],
            repair_operators: vec![RepairOperator::Random, RepairOperator::LocalSearch],
            initial_search_iterations: 10,
            initial_swarm_size: 100,
            seed: None,
        }
    }
}

impl AlnsConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_segment_length(mut self, n: usize) -> Self {
        self.segment_length = n.max(1);
        self
    }

    pub fn with_reaction_factor(mut self, r: f64) -> Self {
        self.reaction_factor = r;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_start_temp_control(mut self, w: f64) -> Self {
        self.start_temp_control = w;
        self
    }

    /// Sets the rewards for new best, accepted better and accepted worse.
    /// The not-accepted score is left unchanged.
    pub fn with_rewards(mut self, new_best: f64, accepted_better: f64, accepted_worse: f64) -> Self {
        self.outcome_scores[1] = new_best;
        self.outcome_scores[2] = accepted_better;
        self.outcome_scores[3] = accepted_worse;
        self
    }

    pub fn with_outcome_scores(mut self, scores: [f64; 4]) -> Self {
        self.outcome_scores = scores;
        self
    }

    pub fn with_operators(
        mut self,
        destroy: Vec<DestroyOperator>,
        repair: Vec<RepairOperator>,
    ) -> Self {
        self.destroy_operators = destroy;
        self.repair_operators = repair;
        self
    }

    /// Sets how many facilities every destroy operator removes.
    pub fn with_destroy_size(mut self, q: usize) -> Self {
        for op in &mut self.destroy_operators {
            *op = op.with_num_to_change(q);
        }
        self
    }

    pub fn with_initial_search(mut self, swarm_size: usize, iterations: usize) -> Self {
        self.initial_swarm_size = swarm_size;
        self.initial_search_iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Largest number of facilities any destroy operator removes.
    pub fn destroy_size(&self) -> usize {
        self.destroy_operators
            .iter()
            .map(|op| op.num_to_change())
            .max()
            .unwrap_or(0)
    }

    /// Flat key/value report of every numeric parameter.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("max_iterations", self.max_iterations as f64),
            ("segment_length", self.segment_length as f64),
            ("reaction_factor", self.reaction_factor),
            ("cooling_factor", self.cooling_factor),
            ("start_temp_control", self.start_temp_control),
            ("not_accepted_reward", self.outcome_scores[0]),
            ("new_best_reward", self.outcome_scores[1]),
            ("accepted_better_reward", self.outcome_scores[2]),
            ("accepted_worse_reward", self.outcome_scores[3]),
            ("destroy_size", self.destroy_size() as f64),
            ("initial_search_iterations", self.initial_search_iterations as f64),
            ("initial_swarm_size", self.initial_swarm_size as f64),
        ]
    }

    /// Sets a parameter by its report key.
    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), FacilityError> {
        match key {
            "max_iterations" => self.max_iterations = parameter_count(key, value)?,
            "segment_length" => self.segment_length = parameter_count(key, value)?,
            "reaction_factor" => self.reaction_factor = value,
            "cooling_factor" => self.cooling_factor = value,
            "start_temp_control" => self.start_temp_control = value,
            "not_accepted_reward" => self.outcome_scores[0] = value,
            "new_best_reward" => self.outcome_scores[1] = value,
            "accepted_better_reward" => self.outcome_scores[2] = value,
            "accepted_worse_reward" => self.outcome_scores[3] = value,
            "destroy_size" => {
                let q = parameter_count(key, value)?;
                for op in &mut self.destroy_operators {
                    *op = op.with_num_to_change(q);
                }
            }
            "initial_search_iterations" => self.initial_search_iterations = parameter_count(key, value)?,
            "initial_swarm_size" => self.initial_swarm_size = parameter_count(key, value)?,
            _ => return Err(FacilityError::parameter(key, "unknown ALNS parameter")),
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.max_iterations == 0 {
            return Err(FacilityError::parameter("max_iterations", "must be positive"));
        }
        if self.segment_length == 0 {
            return Err(FacilityError::parameter("segment_length", "must be positive"));
        }
        for (name, value) in [
            ("reaction_factor", self.reaction_factor),
            ("cooling_factor", self.cooling_factor),
            ("start_temp_control", self.start_temp_control),
        ] {
            if value <= 0.0 || value >= 1.0 {
                return Err(FacilityError::parameter(
                    name,
                    format!("must be in (0, 1), got {value}"),
                ));
            }
        }
        if self.destroy_operators.is_empty() {
            return Err(FacilityError::EmptyOperatorPool("destroy"));
        }
        if self.repair_operators.is_empty() {
            return Err(FacilityError::EmptyOperatorPool("repair"));
        }
        if self.destroy_operators.iter().any(|op| op.num_to_change() == 0) {
            return Err(FacilityError::parameter(
                "destroy_size",
                "every destroy operator must remove at least one facility",
            ));
        }
        if self.initial_search_iterations == 0 || self.initial_swarm_size == 0 {
            return Err(FacilityError::parameter(
                "initial_search_iterations",
                "initial search needs a positive swarm size and iteration count",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlnsConfig::default();
        assert_eq!(config.max_iterations, 25000);
        assert_eq!(config.segment_length, 100);
        assert!((config.reaction_factor - 0.8).abs() < 1e-10);
        assert!((config.cooling_factor - 0.99985).abs() < 1e-10);
        assert_eq!(config.outcome_scores, [0.0, 3.0, 15.0, 24.0]);
        assert_eq!(config.destroy_operators.len(), 3);
        assert_eq!(config.repair_operators.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_factors() {
        assert!(AlnsConfig::default()
            .with_reaction_factor(0.0)
            .validate()
            .is_err());
        assert!(AlnsConfig::default()
            .with_cooling_factor(1.0)
            .validate()
            .is_err());
        assert!(AlnsConfig::default()
            .with_start_temp_control(1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_empty_pools() {
        let config = AlnsConfig::default().with_operators(vec![], vec![RepairOperator::Random]);
        assert_eq!(
            config.validate(),
            Err(FacilityError::EmptyOperatorPool("destroy"))
        );
        let config =
            AlnsConfig::default().with_operators(vec![DestroyOperator::random(1)], vec![]);
        assert_eq!(
            config.validate(),
            Err(FacilityError::EmptyOperatorPool("repair"))
        );
    }

    #[test]
    fn test_destroy_size_applies_to_every_operator() {
        let config = AlnsConfig::default().with_destroy_size(3);
        assert!(config
            .destroy_operators
            .iter()
            .all(|op| op.num_to_change() == 3));
        assert_eq!(config.destroy_size(), 3);
        assert!(AlnsConfig::default()
            .with_destroy_size(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_parameter_report_and_setter() {
        let mut config = AlnsConfig::default();
        config.set_parameter("new_best_reward", 33.0).unwrap();
        config.set_parameter("destroy_size", 2.0).unwrap();
        config.set_parameter("segment_length", 25.0).unwrap();

        let report = config.parameters();
        assert!(report.contains(&("new_best_reward", 33.0)));
        assert!(report.contains(&("destroy_size", 2.0)));
        assert!(report.contains(&("segment_length", 25.0)));
        assert_eq!(config.outcome_scores[1], 33.0);

        assert!(config.set_parameter("temperature", 1.0).is_err());
        assert!(config.set_parameter("max_iterations", -1.0).is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = AlnsConfig::default()
            .with_max_iterations(500)
            .with_segment_length(0)
            .with_rewards(10.0, 5.0, 1.0)
            .with_reaction_factor(0.2)
            .with_initial_search(20, 5)
            .with_seed(42);

        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.segment_length, 1);
        assert_eq!(config.outcome_scores, [0.0, 10.0, 5.0, 1.0]);
        assert_eq!(config.initial_swarm_size, 20);
        assert_eq!(config.seed, Some(42));
    }
}
