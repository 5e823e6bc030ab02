//! # adaptrack-core
//!
//! Shared vocabulary of the adaptive tracking engine:
//! - [`Track`] - capability implemented by every adaptive procedure
//! - [`TrackSettings`], [`TrackingRule`], [`UmlSettings`] - configuration data
//! - [`Phi`], [`TrackResult`] - estimates produced by tracks
//! - [`Randomizer`] - the single injected source of nondeterminism

mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{
    ParameterSpace, ParameterSpaceSetting, PhiParameterSetting, PriorProbabilityKind,
    PriorProbabilitySetting, TrackMethod, TrackSettings, TrackingRule, TrackingSequence,
    UmlSettings,
};

mod types;
pub use types::{LocalUrl, Phi, Threshold, TrackDirection, TrackResult};

mod track;
pub use track::{Track, TrackFactory};

mod randomizer;
pub use randomizer::{Randomizer, SeededRandomizer};
