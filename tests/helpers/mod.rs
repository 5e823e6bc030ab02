//! Test helpers and fixtures for adaptrack integration tests
//!
//! Every stub collaborator is a cheap handle around shared state, so a test
//! keeps one clone for inspection after handing another to the method.

#![allow(dead_code)]

use adaptrack::core::Error as CoreError;
use adaptrack::prelude::*;
use adaptrack::trial::{
    AdaptiveTestResult, CoordinateResponseTrial, CorrectKeywordsTrial, OpenSetTrial,
};
use adaptrack::{Phi, Randomizer, Track, TrackFactory, TrackResult, TrackSettings};
use parking_lot::Mutex;
use std::sync::Arc;

/// Install a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// ---------------------------------------------------------------- track

#[derive(Debug, Default)]
pub struct TrackState {
    pub x: f64,
    pub x_when_updated: Option<f64>,
    pub reversals: usize,
    pub reversals_when_updated: Option<usize>,
    pub complete: bool,
    pub pushed_down: bool,
    pub pushed_up: bool,
    pub reset_called: bool,
    /// `None` makes `result()` fail.
    pub result: Option<TrackResult>,
    pub phi: Option<Phi>,
}

#[derive(Debug, Clone, Default)]
pub struct TrackStub(pub Arc<Mutex<TrackState>>);

impl TrackStub {
    pub fn state(&self) -> parking_lot::MutexGuard<'_, TrackState> {
        self.0.lock()
    }

    fn updated(&self) {
        let mut s = self.0.lock();
        if let Some(x) = s.x_when_updated {
            s.x = x;
        }
        if let Some(r) = s.reversals_when_updated {
            s.reversals = r;
        }
    }
}

impl Track for TrackStub {
    fn down(&mut self) {
        self.0.lock().pushed_down = true;
        self.updated();
    }

    fn up(&mut self) {
        self.0.lock().pushed_up = true;
        self.updated();
    }

    fn x(&self) -> f64 {
        self.0.lock().x
    }

    fn complete(&self) -> bool {
        self.0.lock().complete
    }

    fn reversals(&self) -> usize {
        self.0.lock().reversals
    }

    fn reset(&mut self) {
        self.0.lock().reset_called = true;
    }

    fn result(&self) -> adaptrack::core::Result<TrackResult> {
        self.0
            .lock()
            .result
            .ok_or(CoreError::InsufficientReversals {
                requested: 0,
                recorded: 0,
            })
    }

    fn phi(&self) -> Option<Phi> {
        self.0.lock().phi
    }
}

/// Hands out the prepared tracks in order and records what it was asked for.
#[derive(Debug, Default)]
pub struct TrackFactoryStub {
    pub tracks: Vec<TrackStub>,
    pub made: usize,
    pub methods: Vec<TrackMethod>,
    pub settings: Vec<TrackSettings>,
}

impl TrackFactory for TrackFactoryStub {
    fn make(
        &mut self,
        method: &TrackMethod,
        settings: &TrackSettings,
    ) -> adaptrack::core::Result<Box<dyn Track>> {
        self.methods.push(*method);
        self.settings.push(settings.clone());
        let track = self.tracks.get(self.made).cloned().unwrap_or_default();
        self.made += 1;
        Ok(Box::new(track))
    }
}

// ------------------------------------------------------------- playlists

#[derive(Debug, Default)]
pub struct PlaylistState {
    pub next: LocalUrl,
    pub current: LocalUrl,
    pub directory: LocalUrl,
    pub next_called: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TargetPlaylistStub(pub Arc<Mutex<PlaylistState>>);

impl TargetPlaylistStub {
    pub fn state(&self) -> parking_lot::MutexGuard<'_, PlaylistState> {
        self.0.lock()
    }
}

impl TargetPlaylist for TargetPlaylistStub {
    fn next(&mut self) -> LocalUrl {
        let mut s = self.0.lock();
        s.next_called = true;
        s.next.clone()
    }

    fn current(&self) -> LocalUrl {
        self.0.lock().current.clone()
    }

    fn directory(&self) -> LocalUrl {
        self.0.lock().directory.clone()
    }
}

#[derive(Debug, Default)]
pub struct TargetPlaylistReaderStub {
    pub playlists: Vec<TargetPlaylistStub>,
    pub url: Option<LocalUrl>,
}

impl TargetPlaylistReader for TargetPlaylistReaderStub {
    fn read(&mut self, url: &LocalUrl) -> adaptrack::Result<Vec<Box<dyn TargetPlaylist>>> {
        self.url = Some(url.clone());
        Ok(self
            .playlists
            .iter()
            .cloned()
            .map(|p| Box::new(p) as Box<dyn TargetPlaylist>)
            .collect())
    }
}

/// Playlist of numbered stimuli under one directory.
#[derive(Debug, Clone)]
pub struct CountingPlaylist {
    pub directory: String,
    pub presented: usize,
}

impl TargetPlaylist for CountingPlaylist {
    fn next(&mut self) -> LocalUrl {
        self.presented += 1;
        self.current()
    }

    fn current(&self) -> LocalUrl {
        LocalUrl::new(format!("{}/{}.wav", self.directory, self.presented))
    }

    fn directory(&self) -> LocalUrl {
        LocalUrl::new(self.directory.clone())
    }
}

/// Reader producing one [`CountingPlaylist`] per listed directory.
pub struct DirectoryReader(pub Vec<&'static str>);

impl TargetPlaylistReader for DirectoryReader {
    fn read(&mut self, url: &LocalUrl) -> adaptrack::Result<Vec<Box<dyn TargetPlaylist>>> {
        Ok(self
            .0
            .iter()
            .map(|d| {
                Box::new(CountingPlaylist {
                    directory: format!("{url}/{d}"),
                    presented: 0,
                }) as Box<dyn TargetPlaylist>
            })
            .collect())
    }
}

// ------------------------------------------------------------- evaluator

#[derive(Debug, Default)]
pub struct EvaluatorState {
    pub correct: bool,
    pub correct_color: Color,
    pub correct_number: i32,
    pub file_name: String,
    pub correct_target: Option<LocalUrl>,
    pub correct_color_target: Option<LocalUrl>,
    pub correct_number_target: Option<LocalUrl>,
    pub file_name_target: Option<LocalUrl>,
    pub response: Option<CoordinateResponse>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseEvaluatorStub(pub Arc<Mutex<EvaluatorState>>);

impl ResponseEvaluatorStub {
    pub fn state(&self) -> parking_lot::MutexGuard<'_, EvaluatorState> {
        self.0.lock()
    }
}

impl ResponseEvaluator for ResponseEvaluatorStub {
    fn correct(&self, target: &LocalUrl, response: &CoordinateResponse) -> bool {
        let mut s = self.0.lock();
        s.correct_target = Some(target.clone());
        s.response = Some(*response);
        s.correct
    }

    fn correct_color(&self, target: &LocalUrl) -> Color {
        let mut s = self.0.lock();
        s.correct_color_target = Some(target.clone());
        s.correct_color
    }

    fn correct_number(&self, target: &LocalUrl) -> i32 {
        let mut s = self.0.lock();
        s.correct_number_target = Some(target.clone());
        s.correct_number
    }

    fn file_name(&self, target: &LocalUrl) -> String {
        let mut s = self.0.lock();
        s.file_name_target = Some(target.clone());
        s.file_name.clone()
    }
}

// ------------------------------------------------------------ randomizer

#[derive(Debug, Default)]
pub struct RandomizerState {
    pub lower: i32,
    pub upper: i32,
    pub int: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RandomizerStub(pub Arc<Mutex<RandomizerState>>);

impl RandomizerStub {
    pub fn state(&self) -> parking_lot::MutexGuard<'_, RandomizerState> {
        self.0.lock()
    }

    pub fn set_random_int(&self, int: i32) {
        self.0.lock().int = int;
    }
}

impl Randomizer for RandomizerStub {
    fn between_inclusive_int(&mut self, lower: i32, upper: i32) -> i32 {
        let mut s = self.0.lock();
        s.lower = lower;
        s.upper = upper;
        s.int
    }

    fn between_inclusive_float(&mut self, lower: f64, _upper: f64) -> f64 {
        lower
    }
}

// ----------------------------------------------------------- output file

#[derive(Debug, Default)]
pub struct OutputFileStub {
    pub coordinate_response_trial: Option<CoordinateResponseTrial>,
    pub open_set_trial: Option<OpenSetTrial>,
    pub correct_keywords_trial: Option<CorrectKeywordsTrial>,
    pub test_results: Vec<AdaptiveTestResult>,
}

impl OutputFile for OutputFileStub {
    fn write_coordinate_response_trial(
        &mut self,
        trial: &CoordinateResponseTrial,
    ) -> adaptrack::Result<()> {
        self.coordinate_response_trial = Some(*trial);
        Ok(())
    }

    fn write_open_set_trial(&mut self, trial: &OpenSetTrial) -> adaptrack::Result<()> {
        self.open_set_trial = Some(trial.clone());
        Ok(())
    }

    fn write_correct_keywords_trial(
        &mut self,
        trial: &CorrectKeywordsTrial,
    ) -> adaptrack::Result<()> {
        self.correct_keywords_trial = Some(trial.clone());
        Ok(())
    }

    fn write_test_results(&mut self, results: &[AdaptiveTestResult]) -> adaptrack::Result<()> {
        self.test_results = results.to_vec();
        Ok(())
    }
}

// --------------------------------------------------------------- fixture

/// An [`AdaptiveMethod`] wired to three stub track/playlist pairs.
pub struct Fixture {
    pub method: AdaptiveMethod,
    pub test: AdaptiveTest,
    pub tracks: Vec<TrackStub>,
    pub playlists: Vec<TargetPlaylistStub>,
    pub factory: TrackFactoryStub,
    pub reader: TargetPlaylistReaderStub,
    pub evaluator: ResponseEvaluatorStub,
    pub randomizer: RandomizerStub,
    pub output: OutputFileStub,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let tracks: Vec<TrackStub> = (0..3).map(|_| TrackStub::default()).collect();
        let playlists: Vec<TargetPlaylistStub> =
            (0..3).map(|_| TargetPlaylistStub::default()).collect();
        let evaluator = ResponseEvaluatorStub::default();
        let randomizer = RandomizerStub::default();
        let method = AdaptiveMethod::builder()
            .evaluator(evaluator.clone())
            .randomizer(randomizer.clone())
            .build()
            .expect("evaluator is set");
        Self {
            method,
            test: AdaptiveTest::default(),
            factory: TrackFactoryStub {
                tracks: tracks.clone(),
                ..Default::default()
            },
            reader: TargetPlaylistReaderStub {
                playlists: playlists.clone(),
                url: None,
            },
            tracks,
            playlists,
            evaluator,
            randomizer,
            output: OutputFileStub::default(),
        }
    }

    pub fn initialize(&mut self) {
        self.method
            .initialize(&self.test, &mut self.reader, &mut self.factory)
            .expect("stub collaborators do not fail");
    }

    pub fn track(&self, i: usize) -> parking_lot::MutexGuard<'_, TrackState> {
        self.tracks[i].state()
    }

    pub fn playlist(&self, i: usize) -> parking_lot::MutexGuard<'_, PlaylistState> {
        self.playlists[i].state()
    }

    /// Make `select` the index the next selection draws.
    pub fn select_next(&self, select: i32) {
        self.randomizer.set_random_int(select);
    }
}
