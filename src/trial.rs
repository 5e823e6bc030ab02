//! Per-trial and per-test records handed to an [`OutputFile`](crate::OutputFile).

use adaptrack_core::{Error as CoreError, LocalUrl, Phi, Threshold, TrackResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Green,
    Red,
    Blue,
    White,
    #[default]
    NotAColor,
}

/// A coordinate-response-measure answer ("ready Baron go to blue five").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateResponse {
    pub number: i32,
    pub color: Color,
}

/// Number of keywords of a sentence repeated correctly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectKeywords {
    pub count: usize,
}

impl CorrectKeywords {
    /// Keywords needed for the sentence to count as correct.
    pub const THRESHOLD: usize = 2;

    pub fn correct(&self) -> bool {
        self.count >= Self::THRESHOLD
    }
}

/// Track state around one response: the SNR it was presented at, and the
/// reversals and estimate after the track took the response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveProgress {
    pub snr_db: f64,
    pub reversals: usize,
    pub phi: Option<Phi>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateResponseTrial {
    pub subject_color: Color,
    pub subject_number: i32,
    pub correct_color: Color,
    pub correct_number: i32,
    pub correct: bool,
    #[serde(flatten)]
    pub progress: AdaptiveProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenSetTrial {
    pub target: String,
    pub correct: bool,
    #[serde(flatten)]
    pub progress: AdaptiveProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectKeywordsTrial {
    pub count: usize,
    pub target: String,
    pub correct: bool,
    #[serde(flatten)]
    pub progress: AdaptiveProgress,
}

/// Final estimate of one playlist's track.
///
/// A track that cannot summarize itself (a Levitt track that never
/// reversed) leaves `result` empty and says why in `error`; the other
/// playlists keep their estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveTestResult {
    pub targets_url: LocalUrl,
    pub result: Option<TrackResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdaptiveTestResult {
    pub fn new(targets_url: LocalUrl, outcome: Result<TrackResult, CoreError>) -> Self {
        match outcome {
            Ok(result) => Self {
                targets_url,
                result: Some(result),
                error: None,
            },
            Err(e) => Self {
                targets_url,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn threshold(&self) -> Option<Threshold> {
        self.result.as_ref().and_then(TrackResult::threshold)
    }

    pub fn phi(&self) -> Option<Phi> {
        self.result.as_ref().and_then(TrackResult::phi)
    }
}
