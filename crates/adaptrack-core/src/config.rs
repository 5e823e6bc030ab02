//! Track configuration.
//!
//! Everything here is plain data: a settings interpreter fills these in from
//! key/value pairs and the track factory turns them into running tracks.

use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// One phase of a transformed up-down rule.
///
/// A step of `step_size` is taken after `down` consecutive correct or `up`
/// consecutive incorrect responses. The phase ends after `run_count`
/// reversals at this step size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSequence {
    pub run_count: usize,
    pub step_size: f64,
    pub down: usize,
    pub up: usize,
}

impl TrackingSequence {
    pub const fn new(run_count: usize, step_size: f64, down: usize, up: usize) -> Self {
        Self {
            run_count,
            step_size,
            down,
            up,
        }
    }
}

/// Ordered phases of a Levitt track.
pub type TrackingRule = Vec<TrackingSequence>;

/// Per-track configuration shared by all track variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    pub rule: TrackingRule,
    pub starting_x: f64,
    pub ceiling: f64,
    pub floor: f64,
    /// Consecutive pushes against a bound that end the track.
    pub bump_limit: usize,
    /// Number of trailing reversals averaged into the threshold.
    pub threshold_reversals: usize,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            rule: TrackingRule::new(),
            starting_x: 0.0,
            ceiling: f64::INFINITY,
            floor: f64::NEG_INFINITY,
            bump_limit: usize::MAX,
            threshold_reversals: 0,
        }
    }
}

impl TrackSettings {
    pub fn validate(&self) -> Result<()> {
        if self.floor.is_nan() || self.ceiling.is_nan() || self.starting_x.is_nan() {
            return Err(Error::InvalidConfig(
                "track bounds and starting x must be numbers".into(),
            ));
        }
        if self.floor > self.ceiling {
            return Err(Error::InvalidConfig(format!(
                "floor {} above ceiling {}",
                self.floor, self.ceiling
            )));
        }
        if self.starting_x < self.floor || self.starting_x > self.ceiling {
            return Err(Error::InvalidConfig(format!(
                "starting x {} outside [{}, {}]",
                self.starting_x, self.floor, self.ceiling
            )));
        }
        Ok(())
    }
}

/// How a parameter's candidate values are spread between its bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterSpace {
    #[default]
    Linear,
    Log,
}

/// Candidate values for one psychometric-function parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpaceSetting {
    pub lower: f64,
    pub upper: f64,
    pub n: usize,
    pub space: ParameterSpace,
}

impl ParameterSpaceSetting {
    pub const fn linear(lower: f64, upper: f64, n: usize) -> Self {
        Self {
            lower,
            upper,
            n,
            space: ParameterSpace::Linear,
        }
    }

    pub const fn log(lower: f64, upper: f64, n: usize) -> Self {
        Self {
            lower,
            upper,
            n,
            space: ParameterSpace::Log,
        }
    }
}

impl fmt::Display for ParameterSpaceSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.space {
            ParameterSpace::Linear => "linear",
            ParameterSpace::Log => "log",
        };
        write!(f, "{} {} {} {}", kind, self.lower, self.upper, self.n)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorProbabilityKind {
    LinearNorm,
    LogNorm,
    #[default]
    Flat,
}

impl PriorProbabilityKind {
    pub fn name(&self) -> &'static str {
        match self {
            PriorProbabilityKind::LinearNorm => "linearnorm",
            PriorProbabilityKind::LogNorm => "lognorm",
            PriorProbabilityKind::Flat => "flat",
        }
    }
}

/// Prior weighting for one psychometric-function parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorProbabilitySetting {
    pub mu: f64,
    pub sigma: f64,
    pub kind: PriorProbabilityKind,
}

impl PriorProbabilitySetting {
    pub const fn linear_norm(mu: f64, sigma: f64) -> Self {
        Self {
            mu,
            sigma,
            kind: PriorProbabilityKind::LinearNorm,
        }
    }

    pub const fn log_norm(mu: f64, sigma: f64) -> Self {
        Self {
            mu,
            sigma,
            kind: PriorProbabilityKind::LogNorm,
        }
    }

    pub const fn flat() -> Self {
        Self {
            mu: 0.0,
            sigma: 0.0,
            kind: PriorProbabilityKind::Flat,
        }
    }
}

impl fmt::Display for PriorProbabilitySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.kind != PriorProbabilityKind::Flat {
            write!(f, " {} {}", self.mu, self.sigma)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhiParameterSetting {
    pub space: ParameterSpaceSetting,
    pub prior: PriorProbabilitySetting,
}

/// Configuration of an Updated Maximum-Likelihood track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UmlSettings {
    pub alpha: PhiParameterSetting,
    pub beta: PhiParameterSetting,
    pub gamma: PhiParameterSetting,
    pub lambda: PhiParameterSetting,
    pub up: usize,
    pub down: usize,
    pub trials: usize,
}

impl Default for UmlSettings {
    fn default() -> Self {
        Self {
            alpha: PhiParameterSetting {
                space: ParameterSpaceSetting::linear(-30.0, 30.0, 61),
                prior: PriorProbabilitySetting::linear_norm(0.0, 10.0),
            },
            beta: PhiParameterSetting {
                space: ParameterSpaceSetting::log(0.1, 10.0, 41),
                prior: PriorProbabilitySetting::log_norm(-0.5, 0.4),
            },
            gamma: PhiParameterSetting {
                space: ParameterSpaceSetting::linear(0.02, 0.2, 11),
                prior: PriorProbabilitySetting::flat(),
            },
            lambda: PhiParameterSetting {
                space: ParameterSpaceSetting::linear(0.02, 0.2, 11),
                prior: PriorProbabilitySetting::flat(),
            },
            up: 1,
            down: 2,
            trials: 0,
        }
    }
}

/// Which adaptive procedure drives a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum TrackMethod {
    #[default]
    Levitt,
    Uml(UmlSettings),
}

impl TrackMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TrackMethod::Levitt => "levitt",
            TrackMethod::Uml(_) => "uml",
        }
    }

    pub fn is_uml(&self) -> bool {
        matches!(self, TrackMethod::Uml(_))
    }
}

impl FromStr for TrackMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "levitt" => Ok(TrackMethod::Levitt),
            "uml" => Ok(TrackMethod::Uml(UmlSettings::default())),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }
}
