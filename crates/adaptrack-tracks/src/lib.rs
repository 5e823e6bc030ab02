//! # adaptrack-tracks
//!
//! Adaptive procedures implementing [`adaptrack_core::Track`]:
//! - [`LevittTrack`] - transformed up-down staircase with phased step sizes
//! - [`UpdatedMaximumLikelihood`] - Bayesian track presenting sweet points of
//!   the estimated psychometric function
//! - [`AdaptiveTrackFactory`] - picks the variant from a [`adaptrack_core::TrackMethod`]

pub mod factory;
pub mod levitt;
pub mod uml;

pub use factory::AdaptiveTrackFactory;
pub use levitt::LevittTrack;
pub use uml::{
    MaximumPosteriorPhi, MeanPhi, PhiComputer, PosteriorDistributions, TrackSpecifications,
    UpdatedMaximumLikelihood,
};
