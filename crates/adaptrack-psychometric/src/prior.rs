//! Discretized parameter spaces and their prior weights.

use adaptrack_core::{
    ParameterSpace, ParameterSpaceSetting, PhiParameterSetting, PriorProbabilityKind,
    PriorProbabilitySetting,
};

/// `n` evenly spaced values from `x1` to `x2`, both endpoints exact.
pub fn linspace(x1: f64, x2: f64, n: usize) -> Vec<f64> {
    match n {
        0 => return Vec::new(),
        1 => return vec![x2],
        _ => {}
    }
    if x1 == x2 {
        return vec![x1; n];
    }
    let mut x = vec![0.0; n];
    let step = (x2 - x1) / (n - 1) as f64;
    x[n - 1] = x2;
    for i in (2..n).rev() {
        x[i - 1] = x2 - step * (n - i) as f64;
    }
    x[0] = x1;
    x
}

/// `n` logarithmically spaced values from `x1` to `x2`.
pub fn logspace(x1: f64, x2: f64, n: usize) -> Vec<f64> {
    linspace(x1.log10(), x2.log10(), n)
        .into_iter()
        .map(|x| 10f64.powf(x))
        .collect()
}

fn normpdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return f64::NAN;
    }
    (-0.5 * ((x - mu) / sigma).powi(2)).exp() / ((2.0 * core::f64::consts::PI).sqrt() * sigma)
}

/// Weights a parameter space.
pub trait PriorProbability {
    fn weights(&self, space: &[f64]) -> Vec<f64>;
}

/// Normal density over the raw parameter values.
#[derive(Debug, Clone, Copy)]
pub struct LinearNormPrior {
    mu: f64,
    sigma: f64,
}

impl LinearNormPrior {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

impl PriorProbability for LinearNormPrior {
    fn weights(&self, space: &[f64]) -> Vec<f64> {
        space.iter().map(|&x| normpdf(x, self.mu, self.sigma)).collect()
    }
}

/// Normal density over `log10` of the parameter values.
#[derive(Debug, Clone, Copy)]
pub struct LogNormPrior {
    mu: f64,
    sigma: f64,
}

impl LogNormPrior {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

impl PriorProbability for LogNormPrior {
    fn weights(&self, space: &[f64]) -> Vec<f64> {
        space
            .iter()
            .map(|&x| normpdf(x.log10(), self.mu, self.sigma))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPrior;

impl PriorProbability for FlatPrior {
    fn weights(&self, space: &[f64]) -> Vec<f64> {
        vec![1.0; space.len()]
    }
}

/// Candidate values of one parameter with matching prior weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDistribution {
    pub space: Vec<f64>,
    pub prior: Vec<f64>,
}

impl ParameterDistribution {
    pub fn new(space: Vec<f64>, probability: &dyn PriorProbability) -> Self {
        let prior = probability.weights(&space);
        Self { space, prior }
    }

    pub fn from_setting(setting: &PhiParameterSetting) -> Self {
        Self::new(make_space(&setting.space), make_prior(&setting.prior).as_ref())
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.is_empty()
    }
}

pub fn make_space(setting: &ParameterSpaceSetting) -> Vec<f64> {
    match setting.space {
        ParameterSpace::Linear => linspace(setting.lower, setting.upper, setting.n),
        ParameterSpace::Log => logspace(setting.lower, setting.upper, setting.n),
    }
}

pub fn make_prior(setting: &PriorProbabilitySetting) -> Box<dyn PriorProbability> {
    match setting.kind {
        PriorProbabilityKind::LinearNorm => Box::new(LinearNormPrior::new(setting.mu, setting.sigma)),
        PriorProbabilityKind::LogNorm => Box::new(LogNormPrior::new(setting.mu, setting.sigma)),
        PriorProbabilityKind::Flat => Box::new(FlatPrior),
    }
}
