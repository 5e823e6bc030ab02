//! # adaptrack - Adaptive Psychoacoustic Tracking
//!
//! Estimates speech-in-noise thresholds by interleaving adaptive tracks,
//! one per target playlist.
//!
//! ## Architecture
//!
//! adaptrack is an umbrella crate that coordinates:
//! - **adaptrack-core** - Track capability, settings, results, randomness source
//! - **adaptrack-psychometric** - Logistic psychometric function, sweet points,
//!   priors, Nelder-Mead simplex
//! - **adaptrack-tracks** - Levitt staircase and Updated Maximum-Likelihood tracks
//!
//! The [`AdaptiveMethod`] orchestrator owns the tracks and talks to the
//! outside world through the traits in [`collaborators`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use adaptrack::prelude::*;
//!
//! let mut test = AdaptiveTest::default();
//! test.configure("targets", "lists/");
//! test.configure("up", "1 1");
//! test.configure("down", "2 2");
//! test.configure("reversals per step size", "4 6");
//! test.configure("step sizes (dB)", "8 4");
//! test.configure("threshold", "6");
//!
//! let mut method = AdaptiveMethod::builder().evaluator(evaluator).build()?;
//! method.initialize(&test, &mut reader, &mut AdaptiveTrackFactory::new())?;
//! ```

/// Re-export of adaptrack-core for direct access
pub use adaptrack_core as core;

/// Re-export of adaptrack-psychometric
pub use adaptrack_psychometric as psychometric;

/// Re-export of adaptrack-tracks
pub use adaptrack_tracks as tracks;

pub use adaptrack_core::{
    LocalUrl, Phi, Randomizer, SeededRandomizer, Threshold, Track, TrackFactory, TrackMethod,
    TrackResult, TrackSettings, TrackingRule, TrackingSequence, UmlSettings,
};
pub use adaptrack_tracks::{AdaptiveTrackFactory, LevittTrack, UpdatedMaximumLikelihood};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::AdaptiveMethodBuilder;

pub mod collaborators;
pub use collaborators::{OutputFile, ResponseEvaluator, TargetPlaylist, TargetPlaylistReader};

mod config;
pub use config::AdaptiveTest;

mod method;
pub use method::AdaptiveMethod;

pub mod trial;
pub use trial::{
    AdaptiveProgress, AdaptiveTestResult, Color, CoordinateResponse, CoordinateResponseTrial,
    CorrectKeywords, CorrectKeywordsTrial, OpenSetTrial,
};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::{
        AdaptiveMethod, AdaptiveTest, AdaptiveTrackFactory, Color, CoordinateResponse,
        CorrectKeywords, Error, LocalUrl, OutputFile, ResponseEvaluator, Result,
        SeededRandomizer, TargetPlaylist, TargetPlaylistReader, TrackMethod,
    };
}
