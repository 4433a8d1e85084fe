//! Error types shared by the facility location engines.

use std::fmt;

/// Errors raised while building a problem, configuring an engine, or
/// running a search.
///
/// All variants are fatal for the run that produced them: engines never
/// retry a failed destroy/repair pairing and never return a partial result.
#[derive(Debug, Clone, PartialEq)]
pub enum FacilityError {
    /// The problem instance is malformed (cost matrix shape, facility budget).
    InvalidProblem(String),

    /// An aggregate/measure combination or legacy code was not recognized.
    UnsupportedProblemType(String),

    /// A configuration value is outside its domain or the key is unknown.
    InvalidParameter {
        /// Parameter key as reported by `parameters()`.
        name: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A destroy or repair pool was configured without operators.
    EmptyOperatorPool(&'static str),

    /// A destroy or repair operator broke its contract.
    InvariantViolation(String),

    /// Random sampling of a closed site gave up after `attempts` draws.
    SamplingExhausted {
        /// Number of draws performed before giving up.
        attempts: usize,
    },
}

impl FacilityError {
    pub(crate) fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FacilityError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FacilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityError::InvalidProblem(msg) => write!(f, "invalid problem: {msg}"),
            FacilityError::UnsupportedProblemType(what) => {
                write!(f, "unsupported problem type: {what}")
            }
            FacilityError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            FacilityError::EmptyOperatorPool(pool) => {
                write!(f, "the {pool} operator pool is empty")
            }
            FacilityError::InvariantViolation(msg) => write!(f, "invariant violated: {msg}"),
            FacilityError::SamplingExhausted { attempts } => write!(
                f,
                "no closed site could be sampled after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for FacilityError {}
