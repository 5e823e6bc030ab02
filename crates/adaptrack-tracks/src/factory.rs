//! Builds the configured track variant.

use crate::levitt::LevittTrack;
use crate::uml::{MeanPhi, PosteriorDistributions, TrackSpecifications, UpdatedMaximumLikelihood};
use adaptrack_core::{Result, Track, TrackFactory, TrackMethod, TrackSettings, UmlSettings};
use adaptrack_psychometric::{LogisticPsychometricFunction, ParameterDistribution};
use tracing::debug;

/// Default [`TrackFactory`]: Levitt tracks from the tracking rule, UML tracks
/// with the logistic function and a posterior-mean estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveTrackFactory;

impl AdaptiveTrackFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn make_uml(
        uml: &UmlSettings,
        settings: &TrackSettings,
    ) -> Result<UpdatedMaximumLikelihood> {
        let distributions = PosteriorDistributions {
            alpha: ParameterDistribution::from_setting(&uml.alpha),
            beta: ParameterDistribution::from_setting(&uml.beta),
            gamma: ParameterDistribution::from_setting(&uml.gamma),
            lambda: ParameterDistribution::from_setting(&uml.lambda),
        };
        let specifications = TrackSpecifications {
            down: uml.down,
            up: uml.up,
            trials: uml.trials,
            starting_x: settings.starting_x,
            upper_bound: settings.ceiling,
            lower_bound: settings.floor,
        };
        UpdatedMaximumLikelihood::new(
            distributions,
            Box::new(LogisticPsychometricFunction::new()),
            Box::new(MeanPhi),
            specifications,
        )
    }
}

impl TrackFactory for AdaptiveTrackFactory {
    fn make(&mut self, method: &TrackMethod, settings: &TrackSettings) -> Result<Box<dyn Track>> {
        settings.validate()?;
        debug!(method = method.name(), starting_x = settings.starting_x, "making track");
        match method {
            TrackMethod::Levitt => Ok(Box::new(LevittTrack::new(settings))),
            TrackMethod::Uml(uml) => Ok(Box::new(Self::make_uml(uml, settings)?)),
        }
    }
}
