//! Logistic psychometric function and its sweet points.
//!
//! The curve is `f(x) = γ + (1 - γ - λ) / (1 + exp(-(x - α)·β))`. Sweet points
//! are the stimulus levels that minimize the expected variance of the α and β
//! estimates; they are located numerically with the simplex minimizer.

use crate::simplex;
use adaptrack_core::Phi;

/// Added to an objective outside the half-plane a search must stay in.
const HALF_PLANE_PENALTY: f64 = 1e10;

/// Distance from α at which the β sweet-point searches start.
const BETA_SEARCH_OFFSET: f64 = 10.0;

pub trait PsychometricFunction: Send {
    /// Probability of a correct response at level `x`.
    fn evaluate(&self, phi: Phi, x: f64) -> f64;

    /// Three ascending levels: the lower β sweet point, the α sweet point and
    /// the upper β sweet point.
    fn sweet_points(&self, phi: Phi) -> [f64; 3];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticPsychometricFunction;

impl LogisticPsychometricFunction {
    pub fn new() -> Self {
        Self
    }
}

impl PsychometricFunction for LogisticPsychometricFunction {
    fn evaluate(&self, phi: Phi, x: f64) -> f64 {
        phi.gamma + (1.0 - phi.gamma - phi.lambda) / (1.0 + (-(x - phi.alpha) * phi.beta).exp())
    }

    fn sweet_points(&self, phi: Phi) -> [f64; 3] {
        let below = simplex::minimize(
            |x| {
                beta_variance(phi, x[0])
                    + if x[0] >= phi.alpha {
                        HALF_PLANE_PENALTY
                    } else {
                        0.0
                    }
            },
            &[phi.alpha - BETA_SEARCH_OFFSET],
        )[0];
        let above = simplex::minimize(
            |x| {
                beta_variance(phi, x[0])
                    + if x[0] <= phi.alpha {
                        HALF_PLANE_PENALTY
                    } else {
                        0.0
                    }
            },
            &[phi.alpha + BETA_SEARCH_OFFSET],
        )[0];
        let center = simplex::minimize(|x| alpha_variance(phi, x[0]), &[phi.alpha])[0];

        let mut points = [below, above, center];
        points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
        points
    }
}

/// Shared numerator of both variance expressions.
fn variance_numerator(phi: Phi, x: f64) -> f64 {
    let e = (phi.beta * (x - phi.alpha)).exp();
    -(2.0 * phi.beta * (phi.alpha - x)).exp()
        * (1.0 + e).powi(2)
        * (-phi.gamma + (phi.lambda - 1.0) * e)
        * (1.0 - phi.gamma + phi.lambda * e)
}

/// Expected variance of the α estimate from a trial at `x`, up to a constant.
fn alpha_variance(phi: Phi, x: f64) -> f64 {
    variance_numerator(phi, x)
        / (phi.beta.powi(2) * (phi.gamma + phi.lambda - 1.0).powi(2))
}

/// Expected variance of the β estimate from a trial at `x`, up to a constant.
fn beta_variance(phi: Phi, x: f64) -> f64 {
    variance_numerator(phi, x)
        / ((x - phi.alpha).powi(2) * (phi.gamma + phi.lambda - 1.0).powi(2))
}
