//! NDPSO configuration.

use crate::error::FacilityError;
use crate::optimizer::parameter_count;

/// Configuration for the discrete particle swarm.
///
/// Each particle derives three candidate positions per iteration: from its
/// own position (probability `inertia`), from its personal best
/// (`cognitive`) and from the swarm's best (`social`). A triggered candidate
/// exchanges one open facility for a random closed site. `inertia` is
/// multiplied by `inertial_discount` once per iteration.
///
/// # Examples
///
/// ```
/// use u_facility::pso::NdpsoConfig;
///
/// let config = NdpsoConfig::default()
///     .with_swarm_size(50)
///     .with_max_iterations(200)
///     .with_coefficients(0.8, 0.6, 0.6)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdpsoConfig {
    /// Number of particles.
    pub swarm_size: usize,

    /// Number of swarm iterations.
    pub max_iterations: usize,

    /// Probability of perturbing the personal-best candidate, in [0, 1].
    pub cognitive: f64,

    /// Probability of perturbing the global-best candidate, in [0, 1].
    pub social: f64,

    /// Initial probability of perturbing the current position, in [0, 1].
    pub inertia: f64,

    /// Per-iteration inertia multiplier, in (0, 1].
    pub inertial_discount: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for NdpsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            max_iterations: 1000,
            cognitive: 0.7,
            social: 0.7,
            inertia: 0.7,
            inertial_discount: 0.9995,
            seed: None,
        }
    }
}

impl NdpsoConfig {
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets `inertia`, `cognitive` and `social` in that order.
    pub fn with_coefficients(mut self, inertia: f64, cognitive: f64, social: f64) -> Self {
        self.inertia = inertia;
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_inertial_discount(mut self, discount: f64) -> Self {
        self.inertial_discount = discount;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Flat key/value report of every numeric parameter.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
            ("inertial_discount", self.inertial_discount),
            ("swarm_size", self.swarm_size as f64),
            ("max_iterations", self.max_iterations as f64),
        ]
    }

    /// Sets a parameter by its report key.
    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), FacilityError> {
        match key {
            "inertia" => self.inertia = value,
            "cognitive" => self.cognitive = value,
            "social" => self.social = value,
            "inertial_discount" => self.inertial_discount = value,
            "swarm_size" => self.swarm_size = parameter_count(key, value)?,
            "max_iterations" => self.max_iterations = parameter_count(key, value)?,
            _ => return Err(FacilityError::parameter(key, "unknown NDPSO parameter")),
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.swarm_size == 0 {
            return Err(FacilityError::parameter("swarm_size", "must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(FacilityError::parameter("max_iterations", "must be positive"));
        }
        for (name, p) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FacilityError::parameter(
                    name,
                    format!("must be a probability in [0, 1], got {p}"),
                ));
            }
        }
        if self.inertial_discount <= 0.0 || self.inertial_discount > 1.0 {
            return Err(FacilityError::parameter(
                "inertial_discount",
                format!("must be in (0, 1], got {}", self.inertial_discount),
            ));
        }
        Ok(())
    }
}
