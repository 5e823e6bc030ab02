//! Interfaces the orchestrator consumes but does not implement.

use crate::trial::{
    AdaptiveTestResult, Color, CoordinateResponse, CoordinateResponseTrial, CorrectKeywordsTrial,
    OpenSetTrial,
};
use crate::Result;
use adaptrack_core::LocalUrl;

/// An ordered list of stimuli. One playlist is paired with one track.
pub trait TargetPlaylist: Send {
    /// Advance and return the next stimulus.
    fn next(&mut self) -> LocalUrl;

    /// The stimulus most recently returned by [`TargetPlaylist::next`].
    fn current(&self) -> LocalUrl;

    /// Identity of the playlist, reported with its test result.
    fn directory(&self) -> LocalUrl;
}

pub trait TargetPlaylistReader {
    fn read(&mut self, url: &LocalUrl) -> Result<Vec<Box<dyn TargetPlaylist>>>;
}

/// Scores responses against the stimulus that was presented.
pub trait ResponseEvaluator: Send {
    fn correct(&self, target: &LocalUrl, response: &CoordinateResponse) -> bool;

    fn correct_color(&self, target: &LocalUrl) -> Color;

    fn correct_number(&self, target: &LocalUrl) -> i32;

    /// Name of the stimulus as recorded in trial output.
    fn file_name(&self, target: &LocalUrl) -> String;
}

/// Write-only sink for trial and test records.
pub trait OutputFile {
    fn write_coordinate_response_trial(&mut self, trial: &CoordinateResponseTrial) -> Result<()>;

    fn write_open_set_trial(&mut self, trial: &OpenSetTrial) -> Result<()>;

    fn write_correct_keywords_trial(&mut self, trial: &CorrectKeywordsTrial) -> Result<()>;

    fn write_test_results(&mut self, results: &[AdaptiveTestResult]) -> Result<()>;
}
