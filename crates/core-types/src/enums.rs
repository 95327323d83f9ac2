use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shell length used when a boat-class code is not recognised.
///
/// Unknown classes resolve to this value instead of failing. Callers that need
/// to reject unknown codes should parse with [`ShellClass::from_str`].
pub const DEFAULT_SHELL_LENGTH_M: f64 = 10.0;

/// A rowing boat configuration, keyed by its standard code (e.g. "8+").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellClass {
    #[serde(rename = "8+")]
    Eight,
    #[serde(rename = "4+")]
    CoxedFour,
    #[serde(rename = "4-")]
    StraightFour,
    #[serde(rename = "4x")]
    Quad,
    #[serde(rename = "2+")]
    CoxedPair,
    #[serde(rename = "2-")]
    Pair,
    #[serde(rename = "2x")]
    Double,
    #[serde(rename = "1x")]
    Single,
}

impl ShellClass {
    pub const ALL: [ShellClass; 8] = [
        ShellClass::Eight,
        ShellClass::CoxedFour,
        ShellClass::StraightFour,
        ShellClass::Quad,
        ShellClass::CoxedPair,
        ShellClass::Pair,
        ShellClass::Double,
        ShellClass::Single,
    ];

    /// The standard code for this class, as it appears in result sheets.
    pub fn code(&self) -> &'static str {
        match self {
            ShellClass::Eight => "8+",
            ShellClass::CoxedFour => "4+",
            ShellClass::StraightFour => "4-",
            ShellClass::Quad => "4x",
            ShellClass::CoxedPair => "2+",
            ShellClass::Pair => "2-",
            ShellClass::Double => "2x",
            ShellClass::Single => "1x",
        }
    }

    /// Reference shell length in meters, used to convert distance gaps to boat lengths.
    pub fn length_meters(&self) -> f64 {
        match self {
            ShellClass::Eight => 18.0,
            ShellClass::CoxedFour => 13.0,
            ShellClass::StraightFour => 12.5,
            ShellClass::Quad => 12.5,
            ShellClass::CoxedPair => 10.5,
            ShellClass::Pair => 10.0,
            ShellClass::Double => 10.0,
            ShellClass::Single => 8.0,
        }
    }
}

impl fmt::Display for ShellClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ShellClass {
    type Err = CoreError;

    /// Strict lookup: an unrecognised code is an error, not a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ShellClass::ALL
            .into_iter()
            .find(|class| class.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CoreError::UnknownBoatClass(code.to_string()))
    }
}

/// Lenient shell-length lookup by class code.
///
/// Returns [`DEFAULT_SHELL_LENGTH_M`] for unrecognised codes.
pub fn shell_length_for(boat_class: &str) -> f64 {
    match boat_class.parse::<ShellClass>() {
        Ok(class) => class.length_meters(),
        Err(_) => {
            tracing::warn!(
                boat_class,
                fallback_m = DEFAULT_SHELL_LENGTH_M,
                "Unknown boat class, using default shell length."
            );
            DEFAULT_SHELL_LENGTH_M
        }
    }
}

/// Identifies one of the two boats in a pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the other boat of the pair.
    pub fn opposite(&self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// How per-race speeds are combined into a team's adjusted speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationRule {
    /// Plain mean of per-race speeds; every race counts equally.
    #[default]
    ArithmeticMean,
    /// Mean of per-race speeds weighted by race distance.
    DistanceWeighted,
}

impl FromStr for AggregationRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "arithmetic_mean" | "mean" => Ok(AggregationRule::ArithmeticMean),
            "distance_weighted" => Ok(AggregationRule::DistanceWeighted),
            other => Err(CoreError::invalid(
                "aggregation",
                format!("unknown rule '{}'", other),
            )),
        }
    }
}
