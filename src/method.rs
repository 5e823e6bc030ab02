//! The adaptive test session: interleaved tracks, one per target playlist.

use crate::collaborators::{OutputFile, ResponseEvaluator, TargetPlaylist, TargetPlaylistReader};
use crate::config::AdaptiveTest;
use crate::trial::{
    AdaptiveProgress, AdaptiveTestResult, CoordinateResponse, CoordinateResponseTrial,
    CorrectKeywords, CorrectKeywordsTrial, OpenSetTrial,
};
use crate::{AdaptiveMethodBuilder, Result};
use adaptrack_core::{Error as CoreError, LocalUrl, Randomizer, Track, TrackFactory};
use std::fmt;
use tracing::{debug, info, warn};

struct TargetPlaylistWithTrack {
    playlist: Box<dyn TargetPlaylist>,
    track: Box<dyn Track>,
}

/// Runs an adaptive test over several target playlists.
///
/// Every playlist gets its own track. After each response the pair that
/// presented the stimulus is updated and a new active pair is drawn at
/// random from the tracks that are still running.
///
/// # Example
///
/// ```ignore
/// let mut method = AdaptiveMethod::builder()
///     .evaluator(evaluator)
///     .randomizer(SeededRandomizer::seeded(1))
///     .build()?;
/// method.initialize(&test, &mut reader, &mut AdaptiveTrackFactory::new())?;
/// while !method.complete() {
///     let target = method.next_target()?;
///     // present `target` at `method.snr()?` ...
///     method.submit_correct_response()?;
/// }
/// ```
pub struct AdaptiveMethod {
    evaluator: Box<dyn ResponseEvaluator>,
    randomizer: Box<dyn Randomizer>,
    test: Option<AdaptiveTest>,
    pairs: Vec<TargetPlaylistWithTrack>,
    active: Option<usize>,
    last_coordinate_response: CoordinateResponseTrial,
    last_open_set: OpenSetTrial,
    last_correct_keywords: CorrectKeywordsTrial,
}

impl AdaptiveMethod {
    pub fn builder() -> AdaptiveMethodBuilder {
        AdaptiveMethodBuilder::default()
    }

    pub fn new(evaluator: Box<dyn ResponseEvaluator>, randomizer: Box<dyn Randomizer>) -> Self {
        Self {
            evaluator,
            randomizer,
            test: None,
            pairs: Vec::new(),
            active: None,
            last_coordinate_response: CoordinateResponseTrial::default(),
            last_open_set: OpenSetTrial::default(),
            last_correct_keywords: CorrectKeywordsTrial::default(),
        }
    }

    /// Reads the playlists at `test.targets_url` and pairs each with a new
    /// track. Replaces any previous session.
    pub fn initialize(
        &mut self,
        test: &AdaptiveTest,
        reader: &mut dyn TargetPlaylistReader,
        factory: &mut dyn TrackFactory,
    ) -> Result<()> {
        let playlists = reader.read(&test.targets_url)?;
        if playlists.is_empty() {
            return Err(CoreError::NoTargetPlaylists(test.targets_url.path.clone()).into());
        }

        let method = test.track_method();
        let settings = test.track_settings();
        let pairs = playlists
            .into_iter()
            .map(|playlist| -> Result<TargetPlaylistWithTrack> {
                Ok(TargetPlaylistWithTrack {
                    playlist,
                    track: factory.make(&method, &settings)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            targets = %test.targets_url,
            method = method.name(),
            pairs = pairs.len(),
            "adaptive test initialized"
        );
        self.pairs = pairs;
        self.test = Some(test.clone());
        self.active = None;
        self.select_next_list();
        Ok(())
    }

    /// True once every track is complete.
    pub fn complete(&self) -> bool {
        self.pairs.iter().all(|pair| pair.track.complete())
    }

    pub fn next_target(&mut self) -> Result<LocalUrl> {
        Ok(self.active_pair_mut()?.playlist.next())
    }

    pub fn current_target(&self) -> Result<LocalUrl> {
        Ok(self.active_pair()?.playlist.current())
    }

    /// Level of the next presentation, from the active track.
    pub fn snr(&self) -> Result<f64> {
        Ok(self.active_pair()?.track.x())
    }

    pub fn submit_coordinate_response(&mut self, response: &CoordinateResponse) -> Result<()> {
        let target = self.current_target()?;
        let correct = self.evaluator.correct(&target, response);
        let correct_color = self.evaluator.correct_color(&target);
        let correct_number = self.evaluator.correct_number(&target);
        let progress = self.update_active_track(correct)?;
        self.last_coordinate_response = CoordinateResponseTrial {
            subject_color: response.color,
            subject_number: response.number,
            correct_color,
            correct_number,
            correct,
            progress,
        };
        self.select_next_list();
        Ok(())
    }

    pub fn submit_correct_response(&mut self) -> Result<()> {
        self.submit_open_set(true)
    }

    pub fn submit_incorrect_response(&mut self) -> Result<()> {
        self.submit_open_set(false)
    }

    pub fn submit_correct_keywords(&mut self, keywords: CorrectKeywords) -> Result<()> {
        let target = self.evaluator.file_name(&self.current_target()?);
        let correct = keywords.correct();
        let progress = self.update_active_track(correct)?;
        self.last_correct_keywords = CorrectKeywordsTrial {
            count: keywords.count,
            target,
            correct,
            progress,
        };
        self.select_next_list();
        Ok(())
    }

    fn submit_open_set(&mut self, correct: bool) -> Result<()> {
        let target = self.evaluator.file_name(&self.current_target()?);
        let progress = self.update_active_track(correct)?;
        self.last_open_set = OpenSetTrial {
            target,
            correct,
            progress,
        };
        self.select_next_list();
        Ok(())
    }

    /// Resets every track while leaving playlist positions alone.
    pub fn reset_tracks(&mut self) {
        for pair in &mut self.pairs {
            pair.track.reset();
        }
        info!(pairs = self.pairs.len(), "tracks reset");
        self.select_next_list();
    }

    /// One result per playlist, in current pair order. A track without an
    /// estimate is reported with its error rather than dropping the rest.
    pub fn test_results(&self) -> Vec<AdaptiveTestResult> {
        self.pairs
            .iter()
            .map(|pair| {
                let targets_url = pair.playlist.directory();
                let outcome = pair.track.result();
                if let Err(e) = &outcome {
                    warn!(targets = %targets_url, "no estimate: {e}");
                }
                AdaptiveTestResult::new(targets_url, outcome)
            })
            .collect()
    }

    pub fn write_test_result(&self, out: &mut dyn OutputFile) -> Result<()> {
        out.write_test_results(&self.test_results())
    }

    pub fn write_last_coordinate_response(&self, out: &mut dyn OutputFile) -> Result<()> {
        out.write_coordinate_response_trial(&self.last_coordinate_response)
    }

    pub fn write_last_correct_response(&self, out: &mut dyn OutputFile) -> Result<()> {
        out.write_open_set_trial(&self.last_open_set)
    }

    pub fn write_last_incorrect_response(&self, out: &mut dyn OutputFile) -> Result<()> {
        out.write_open_set_trial(&self.last_open_set)
    }

    pub fn write_last_correct_keywords(&self, out: &mut dyn OutputFile) -> Result<()> {
        out.write_correct_keywords_trial(&self.last_correct_keywords)
    }

    /// Writes the settings the session was initialized with.
    pub fn write_settings(&self, out: &mut impl fmt::Write) -> Result<()> {
        self.test
            .as_ref()
            .ok_or(CoreError::NotInitialized)?
            .write(out)
    }

    pub fn last_coordinate_response(&self) -> &CoordinateResponseTrial {
        &self.last_coordinate_response
    }

    pub fn last_open_set(&self) -> &OpenSetTrial {
        &self.last_open_set
    }

    pub fn last_correct_keywords(&self) -> &CorrectKeywordsTrial {
        &self.last_correct_keywords
    }

    /// Pushes the active track and reports the level it was presented at
    /// along with its state after the push.
    fn update_active_track(&mut self, correct: bool) -> Result<AdaptiveProgress> {
        let track = &mut self.active_pair_mut()?.track;
        let snr_db = track.x();
        if correct {
            track.down();
        } else {
            track.up();
        }
        Ok(AdaptiveProgress {
            snr_db,
            reversals: track.reversals(),
            phi: track.phi(),
        })
    }

    fn active_pair(&self) -> Result<&TargetPlaylistWithTrack> {
        self.active
            .and_then(|index| self.pairs.get(index))
            .ok_or_else(|| CoreError::NotInitialized.into())
    }

    fn active_pair_mut(&mut self) -> Result<&mut TargetPlaylistWithTrack> {
        self.active
            .and_then(|index| self.pairs.get_mut(index))
            .ok_or_else(|| CoreError::NotInitialized.into())
    }

    /// Moves incomplete pairs to the front, keeping their order, and draws
    /// the next active pair among them. With nothing left to run the active
    /// pair stays put.
    fn select_next_list(&mut self) {
        let (mut pairs, complete): (Vec<_>, Vec<_>) = self
            .pairs
            .drain(..)
            .partition(|pair| !pair.track.complete());
        let incomplete = pairs.len();
        pairs.extend(complete);
        self.pairs = pairs;

        if incomplete == 0 {
            self.active.get_or_insert(0);
            info!("all tracks complete");
            return;
        }

        let upper = i32::try_from(incomplete - 1).unwrap_or(i32::MAX);
        let drawn = self.randomizer.between_inclusive_int(0, upper);
        let index = usize::try_from(drawn).unwrap_or(0).min(incomplete - 1);
        debug!(index, incomplete, "selected target list");
        self.active = Some(index);
    }
}
