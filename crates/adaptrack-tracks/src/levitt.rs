//! Transformed up-down track (Levitt, 1971).
//!
//! A step is taken once the same response direction has been confirmed
//! `down`/`up` times in a row. Each change of step direction is a reversal;
//! after `run_count` reversals the rule advances to its next phase. The track
//! completes when every phase is exhausted or when x has been pushed against
//! a bound `bump_limit` times in a row.

use adaptrack_core::{Error, Result, Track, TrackDirection, TrackResult, TrackSettings};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Undefined,
    Rise,
    Fall,
}

#[derive(Debug, Clone)]
pub struct LevittTrack {
    run_counts: Vec<usize>,
    /// One longer than `run_counts`; the trailing zero is the step size once
    /// every phase is exhausted.
    step_sizes: Vec<f64>,
    up: Vec<usize>,
    down: Vec<usize>,
    reversal_x: Vec<f64>,
    sequence_index: usize,
    starting_x: f64,
    x: f64,
    ceiling: f64,
    floor: f64,
    bump_limit: usize,
    bump_count: usize,
    same_direction_count: usize,
    run_counter: usize,
    reversals: usize,
    threshold_reversals: usize,
    previous_direction: TrackDirection,
    previous_step: Step,
}

impl LevittTrack {
    /// Phases with a zero run count are skipped.
    pub fn new(settings: &TrackSettings) -> Self {
        let phases = settings.rule.iter().filter(|s| s.run_count != 0);
        let mut step_sizes: Vec<f64> = phases.clone().map(|s| s.step_size).collect();
        step_sizes.push(0.0);

        Self {
            run_counts: phases.clone().map(|s| s.run_count).collect(),
            step_sizes,
            up: phases.clone().map(|s| s.up).collect(),
            down: phases.map(|s| s.down).collect(),
            reversal_x: Vec::new(),
            sequence_index: 0,
            starting_x: settings.starting_x,
            x: settings.starting_x,
            ceiling: settings.ceiling,
            floor: settings.floor,
            bump_limit: settings.bump_limit,
            bump_count: 0,
            same_direction_count: 0,
            run_counter: 0,
            reversals: 0,
            threshold_reversals: settings.threshold_reversals,
            previous_direction: TrackDirection::Undefined,
            previous_step: Step::Undefined,
        }
    }

    /// Index of the active phase; equals the phase count once exhausted.
    pub fn phase(&self) -> usize {
        self.sequence_index
    }

    /// x at every recorded reversal, oldest first.
    pub fn reversal_history(&self) -> &[f64] {
        &self.reversal_x
    }

    fn is_complete(&self) -> bool {
        self.sequence_index == self.run_counts.len() || self.bump_count == self.bump_limit
    }

    fn update(&mut self, direction: TrackDirection) {
        if self.is_complete() {
            return;
        }

        let (bound, threshold) = match direction {
            TrackDirection::Down => (self.floor, self.down[self.sequence_index]),
            _ => (self.ceiling, self.up[self.sequence_index]),
        };

        self.bump_count = if self.x == bound { self.bump_count + 1 } else { 0 };
        self.same_direction_count = if self.previous_direction == direction {
            self.same_direction_count + 1
        } else {
            1
        };
        if self.same_direction_count == threshold {
            self.step(direction);
        }
        self.previous_direction = direction;

        if self.bump_count == self.bump_limit {
            debug!(x = self.x, bumps = self.bump_count, "Levitt track stopped at bound");
        }
    }

    fn step(&mut self, direction: TrackDirection) {
        let (opposite, taken) = match direction {
            TrackDirection::Down => (Step::Rise, Step::Fall),
            _ => (Step::Fall, Step::Rise),
        };
        if self.previous_step == opposite {
            self.reversal();
        }

        let size = self.step_sizes[self.sequence_index];
        self.x = match taken {
            Step::Fall => (self.x - size).max(self.floor),
            _ => (self.x + size).min(self.ceiling),
        };
        self.same_direction_count = 0;
        self.previous_step = taken;
    }

    fn reversal(&mut self) {
        self.reversals += 1;
        self.reversal_x.push(self.x);
        debug!(x = self.x, reversals = self.reversals, "Levitt reversal");

        self.run_counter += 1;
        if self.run_counter == self.run_counts[self.sequence_index] {
            self.run_counter = 0;
            self.sequence_index += 1;
            debug!(phase = self.sequence_index, "Levitt phase advanced");
        }
    }
}

impl Track for LevittTrack {
    fn down(&mut self) {
        self.update(TrackDirection::Down);
    }

    fn up(&mut self) {
        self.update(TrackDirection::Up);
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn complete(&self) -> bool {
        self.is_complete()
    }

    fn reversals(&self) -> usize {
        self.reversals
    }

    fn reset(&mut self) {
        self.x = self.starting_x;
        self.same_direction_count = 0;
        self.reversals = 0;
        self.reversal_x.clear();
        self.previous_direction = TrackDirection::Undefined;
        self.previous_step = Step::Undefined;
        self.sequence_index = 0;
        self.run_counter = 0;
        self.bump_count = 0;
    }

    /// Mean x of the last `threshold_reversals` reversals (or of all of them
    /// when fewer were recorded).
    fn result(&self) -> Result<TrackResult> {
        let count = self.threshold_reversals.min(self.reversal_x.len());
        if count == 0 {
            return Err(Error::InsufficientReversals {
                requested: self.threshold_reversals,
                recorded: self.reversal_x.len(),
            });
        }
        let sum: f64 = self.reversal_x.iter().rev().take(count).sum();
        Ok(TrackResult::Threshold(sum / count as f64))
    }
}
