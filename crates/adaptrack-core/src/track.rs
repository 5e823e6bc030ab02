//! The `Track` capability shared by every adaptive procedure.

use crate::config::{TrackMethod, TrackSettings};
use crate::types::{Phi, TrackResult};
use crate::Result;

/// One adaptive procedure tracking a single SNR dimension.
///
/// `down()` records a correct response (make the task harder), `up()` an
/// incorrect one. Both are no-ops once [`Track::complete`] is true.
pub trait Track: Send {
    fn down(&mut self);

    fn up(&mut self);

    /// Current SNR to present.
    fn x(&self) -> f64;

    fn complete(&self) -> bool;

    fn reversals(&self) -> usize;

    /// Return to the starting state.
    fn reset(&mut self);

    fn result(&self) -> Result<TrackResult>;

    /// Current psychometric-function estimate, if the procedure fits one.
    fn phi(&self) -> Option<Phi> {
        None
    }
}

/// Builds the configured track variant for one target playlist.
pub trait TrackFactory {
    fn make(&mut self, method: &TrackMethod, settings: &TrackSettings) -> Result<Box<dyn Track>>;
}
