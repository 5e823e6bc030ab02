//! Builder for configuring and constructing an `AdaptiveMethod`.

use crate::collaborators::ResponseEvaluator;
use crate::{AdaptiveMethod, Result};
use adaptrack_core::{Error as CoreError, Randomizer, SeededRandomizer};

/// The response evaluator is required. The randomizer defaults to an
/// entropy-seeded [`SeededRandomizer`]; pass [`SeededRandomizer::seeded`]
/// to make track interleaving reproducible.
///
/// # Example
///
/// ```ignore
/// use adaptrack::prelude::*;
///
/// let method = AdaptiveMethod::builder()
///     .evaluator(evaluator)
///     .randomizer(SeededRandomizer::seeded(7))
///     .build()?;
/// ```
#[derive(Default)]
pub struct AdaptiveMethodBuilder {
    evaluator: Option<Box<dyn ResponseEvaluator>>,
    randomizer: Option<Box<dyn Randomizer>>,
}

impl AdaptiveMethodBuilder {
    pub fn evaluator(mut self, evaluator: impl ResponseEvaluator + 'static) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn randomizer(mut self, randomizer: impl Randomizer + 'static) -> Self {
        self.randomizer = Some(Box::new(randomizer));
        self
    }

    pub fn build(self) -> Result<AdaptiveMethod> {
        let evaluator = self
            .evaluator
            .ok_or(CoreError::MissingCollaborator("response evaluator"))?;
        let randomizer = self
            .randomizer
            .unwrap_or_else(|| Box::new(SeededRandomizer::from_entropy()));
        Ok(AdaptiveMethod::new(evaluator, randomizer))
    }
}
