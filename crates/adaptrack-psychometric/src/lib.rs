//! # adaptrack-psychometric
//!
//! Numerical pieces of the Bayesian procedure:
//! - **simplex** - Nelder-Mead minimizer over a small real vector
//! - **logistic** - 4-parameter logistic psychometric function and sweet points
//! - **prior** - parameter spacing and prior probability weights
//!
//! ```rust
//! use adaptrack_core::Phi;
//! use adaptrack_psychometric::{LogisticPsychometricFunction, PsychometricFunction};
//!
//! let f = LogisticPsychometricFunction::new();
//! let phi = Phi::new(0.0, 1.0, 0.0, 0.0);
//! assert_eq!(f.evaluate(phi, 0.0), 0.5);
//! ```

pub mod logistic;
pub mod prior;
pub mod simplex;

pub use logistic::{LogisticPsychometricFunction, PsychometricFunction};
pub use prior::{
    linspace, logspace, make_prior, make_space, FlatPrior, LinearNormPrior, LogNormPrior,
    ParameterDistribution, PriorProbability,
};
pub use simplex::{minimize, minimize_with, SimplexOptions};
