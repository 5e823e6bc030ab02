//! Value types shared by every track variant.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Logistic psychometric-function parameters.
///
/// `alpha` is the location (threshold), `beta` the slope, `gamma` the lower
/// asymptote (guess rate) and `lambda` the lapse rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Phi {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub lambda: f64,
}

impl Phi {
    pub const fn new(alpha: f64, beta: f64, gamma: f64, lambda: f64) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            lambda,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.alpha, self.beta, self.gamma, self.lambda]
    }
}

impl fmt::Display for Phi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.alpha, self.beta, self.gamma, self.lambda)
    }
}

/// Threshold estimate in dB SNR.
pub type Threshold = f64;

/// Final summary of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackResult {
    /// Mean of the last reversal levels (Levitt).
    Threshold(Threshold),
    /// Fitted psychometric function (UML).
    Phi(Phi),
}

impl TrackResult {
    pub fn threshold(&self) -> Option<Threshold> {
        match self {
            TrackResult::Threshold(t) => Some(*t),
            TrackResult::Phi(_) => None,
        }
    }

    pub fn phi(&self) -> Option<Phi> {
        match self {
            TrackResult::Threshold(_) => None,
            TrackResult::Phi(phi) => Some(*phi),
        }
    }
}

impl From<Threshold> for TrackResult {
    fn from(t: Threshold) -> Self {
        TrackResult::Threshold(t)
    }
}

impl From<Phi> for TrackResult {
    fn from(phi: Phi) -> Self {
        TrackResult::Phi(phi)
    }
}

/// Location of a stimulus or stimulus directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalUrl {
    pub path: String,
}

impl LocalUrl {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl From<&str> for LocalUrl {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for LocalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Direction of the most recent track movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackDirection {
    #[default]
    Undefined,
    Up,
    Down,
}
