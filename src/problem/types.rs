//! Problem-type descriptors: how customer costs roll up into one objective.

use crate::error::FacilityError;
use std::fmt;
use std::str::FromStr;

/// Per-facility measure computed from the customers assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measure {
    /// Sum of assignment costs of the facility's customers.
    Star,
    /// Largest assignment cost among the facility's customers.
    Radius,
    /// Smallest assignment cost among the facility's customers.
    Ray,
}

/// How per-facility measures combine into the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregate {
    Max,
    Min,
    Sum,
}

/// Whether the objective is minimized or maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

/// An aggregate × measure pair, e.g. `Sum` of `Star` (the p-median objective)
/// or `Max` of `Radius` (the p-center objective).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemType {
    pub aggregate: Aggregate,
    pub measure: Measure,
}

/// Legacy ordering of the nine combinations used by stored datasets.
const CODES: [ProblemType; 9] = [
    ProblemType::new(Aggregate::Max, Measure::Star),
    ProblemType::new(Aggregate::Sum, Measure::Star),
    ProblemType::new(Aggregate::Min, Measure::Star),
    ProblemType::new(Aggregate::Max, Measure::Radius),
    ProblemType::new(Aggregate::Sum, Measure::Radius),
    ProblemType::new(Aggregate::Min, Measure::Radius),
    ProblemType::new(Aggregate::Max, Measure::Ray),
    ProblemType::new(Aggregate::Sum, Measure::Ray),
    ProblemType::new(Aggregate::Min, Measure::Ray),
];

impl ProblemType {
    pub const fn new(aggregate: Aggregate, measure: Measure) -> Self {
        Self { aggregate, measure }
    }

    /// Every supported combination, in legacy code order.
    pub fn all() -> [ProblemType; 9] {
        CODES
    }

    /// Maps a legacy numeric code (0..=8) to its problem type.
    pub fn from_code(code: usize) -> Result<Self, FacilityError> {
        CODES
            .get(code)
            .copied()
            .ok_or_else(|| FacilityError::UnsupportedProblemType(format!("code {code}")))
    }

    /// Legacy numeric code of this combination.
    pub fn code(&self) -> usize {
        CODES.iter().position(|t| t == self).unwrap_or_default()
    }
}

impl Default for ProblemType {
    fn default() -> Self {
        ProblemType::new(Aggregate::Max, Measure::Star)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Measure::Star => "star",
            Measure::Radius => "radius",
            Measure::Ray => "ray",
        })
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Sum => "sum",
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Minimize => "minimize",
            Direction::Maximize => "maximize",
        })
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.aggregate, self.measure)
    }
}

impl FromStr for Measure {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "star" => Ok(Measure::Star),
            "radius" => Ok(Measure::Radius),
            "ray" => Ok(Measure::Ray),
            other => Err(FacilityError::UnsupportedProblemType(format!(
                "measure `{other}`"
            ))),
        }
    }
}

impl FromStr for Aggregate {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(Aggregate::Max),
            "min" => Ok(Aggregate::Min),
            "sum" => Ok(Aggregate::Sum),
            other => Err(FacilityError::UnsupportedProblemType(format!(
                "aggregate `{other}`"
            ))),
        }
    }
}

impl FromStr for Direction {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(Direction::Minimize),
            "max" | "maximize" => Ok(Direction::Maximize),
            other => Err(FacilityError::UnsupportedProblemType(format!(
                "direction `{other}`"
            ))),
        }
    }
}

/// Parses `"<aggregate>_<measure>"`, e.g. `"sum_star"` or `"MAX_RADIUS"`.
impl FromStr for ProblemType {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (aggregate, measure) = s
            .split_once(['_', '-', ' '])
            .ok_or_else(|| FacilityError::UnsupportedProblemType(s.to_string()))?;
        Ok(ProblemType::new(aggregate.parse()?, measure.parse()?))
    }
}
