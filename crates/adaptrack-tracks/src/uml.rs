//! Updated Maximum-Likelihood track (Shen & Richards, 2012).
//!
//! Keeps a log-space posterior over a discrete (α, β, γ, λ) grid. Every
//! response multiplies in the likelihood of that response at the presented
//! level, a point estimate of φ is taken from the posterior, and the next
//! level is one of five sweet points of the estimated psychometric function.
//! A `down`/`up` confirmation rule moves between sweet points.

use adaptrack_core::{Error, Phi, Result, Track, TrackDirection, TrackResult};
use adaptrack_psychometric::{ParameterDistribution, PsychometricFunction};
use tracing::debug;

/// Priors of the four psychometric-function parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PosteriorDistributions {
    pub alpha: ParameterDistribution,
    pub beta: ParameterDistribution,
    pub gamma: ParameterDistribution,
    pub lambda: ParameterDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSpecifications {
    /// Consecutive correct responses before moving to an easier sweet point.
    pub down: usize,
    /// Consecutive incorrect responses before moving to a harder sweet point.
    pub up: usize,
    /// Responses after which the track is complete.
    pub trials: usize,
    pub starting_x: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

/// Point estimate of φ from the current posterior.
pub trait PhiComputer: Send {
    fn compute(&self, uml: &UpdatedMaximumLikelihood) -> Phi;
}

/// Posterior mean of each parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanPhi;

impl PhiComputer for MeanPhi {
    fn compute(&self, uml: &UpdatedMaximumLikelihood) -> Phi {
        let weights: Vec<f64> = uml.posterior().iter().map(|p| p.exp()).collect();
        let sum: f64 = weights.iter().sum();

        let mut estimate = Phi::default();
        for (i, w) in weights.iter().map(|w| w / sum).enumerate() {
            estimate.alpha += w * uml.alpha_space(i);
            estimate.beta += w * uml.beta_space(i);
            estimate.gamma += w * uml.gamma_space(i);
            estimate.lambda += w * uml.lambda_space(i);
        }
        estimate
    }
}

/// Grid cell with the highest posterior probability (first one on ties).
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumPosteriorPhi;

impl PhiComputer for MaximumPosteriorPhi {
    fn compute(&self, uml: &UpdatedMaximumLikelihood) -> Phi {
        let best = uml
            .posterior()
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                Some((_, max)) if max >= p => best,
                _ => Some((i, p)),
            })
            .map_or(0, |(i, _)| i);
        uml.grid_phi(best)
    }
}

pub struct UpdatedMaximumLikelihood {
    distributions: PosteriorDistributions,
    specifications: TrackSpecifications,
    function: Box<dyn PsychometricFunction>,
    phi_computer: Box<dyn PhiComputer>,
    /// Log-probabilities, λ outermost and α innermost.
    posterior: Vec<f64>,
    /// Which of the five candidate levels are informative for this grid.
    sweet_point_indices: Vec<usize>,
    sweet_points: Vec<f64>,
    reversal_x: Vec<f64>,
    phi: Phi,
    x: f64,
    consecutive_down: usize,
    consecutive_up: usize,
    x_candidate_index: usize,
    direction: TrackDirection,
    trials: usize,
    reversals: usize,
}

impl UpdatedMaximumLikelihood {
    pub fn new(
        distributions: PosteriorDistributions,
        function: Box<dyn PsychometricFunction>,
        phi_computer: Box<dyn PhiComputer>,
        specifications: TrackSpecifications,
    ) -> Result<Self> {
        for (name, d) in [
            ("lambda", &distributions.lambda),
            ("gamma", &distributions.gamma),
            ("beta", &distributions.beta),
            ("alpha", &distributions.alpha),
        ] {
            if d.prior.is_empty() {
                return Err(Error::EmptyParameterSpace(name));
            }
        }

        let mut sweet_point_indices = Vec::with_capacity(5);
        if distributions.alpha.len() > 1 {
            sweet_point_indices.push(2);
        }
        if distributions.beta.len() > 1 {
            sweet_point_indices.extend([1, 3]);
        }
        if distributions.gamma.len() > 1 {
            sweet_point_indices.push(0);
        }
        if distributions.lambda.len() > 1 {
            sweet_point_indices.push(4);
        }
        sweet_point_indices.sort_unstable();
        if sweet_point_indices.is_empty() {
            sweet_point_indices.push(2);
        }

        let mut track = Self {
            distributions,
            specifications,
            function,
            phi_computer,
            posterior: Vec::new(),
            sweet_point_indices,
            sweet_points: Vec::new(),
            reversal_x: Vec::new(),
            phi: Phi::default(),
            x: specifications.starting_x,
            consecutive_down: 0,
            consecutive_up: 0,
            x_candidate_index: 0,
            direction: TrackDirection::Undefined,
            trials: 0,
            reversals: 0,
        };
        track.reset();
        Ok(track)
    }

    /// The five candidate levels from the last update; empty before the first
    /// response.
    pub fn sweet_points(&self) -> &[f64] {
        &self.sweet_points
    }

    pub fn posterior(&self) -> &[f64] {
        &self.posterior
    }

    pub fn current_phi(&self) -> Phi {
        self.phi
    }

    pub fn reversal_history(&self) -> &[f64] {
        &self.reversal_x
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn alpha_space(&self, index: usize) -> f64 {
        let alpha = &self.distributions.alpha.space;
        alpha[index % alpha.len()]
    }

    pub fn beta_space(&self, index: usize) -> f64 {
        let d = &self.distributions;
        d.beta.space[(index / d.alpha.len()) % d.beta.len()]
    }

    pub fn gamma_space(&self, index: usize) -> f64 {
        let d = &self.distributions;
        d.gamma.space[(index / d.alpha.len() / d.beta.len()) % d.gamma.len()]
    }

    pub fn lambda_space(&self, index: usize) -> f64 {
        let d = &self.distributions;
        d.lambda.space
            [(index / d.alpha.len() / d.beta.len() / d.gamma.len()) % d.lambda.len()]
    }

    /// Parameters of one posterior grid cell.
    pub fn grid_phi(&self, index: usize) -> Phi {
        Phi::new(
            self.alpha_space(index),
            self.beta_space(index),
            self.gamma_space(index),
            self.lambda_space(index),
        )
    }

    fn lowest_index(&self) -> usize {
        self.sweet_point_indices.first().copied().unwrap_or(2)
    }

    fn highest_index(&self) -> usize {
        self.sweet_point_indices.last().copied().unwrap_or(2)
    }

    fn evaluate_grid(&self) -> Vec<f64> {
        let d = &self.distributions;
        let mut evaluations = Vec::with_capacity(self.posterior.len());
        for &lambda in &d.lambda.space {
            for &gamma in &d.gamma.space {
                for &beta in &d.beta.space {
                    for &alpha in &d.alpha.space {
                        evaluations.push(
                            self.function
                                .evaluate(Phi::new(alpha, beta, gamma, lambda), self.x),
                        );
                    }
                }
            }
        }
        evaluations
    }

    fn add_to_posterior_and_shift_by_max(&mut self, likelihood: Vec<f64>) {
        for (p, l) in self.posterior.iter_mut().zip(log_normalized(likelihood)) {
            *p += l;
        }
        let max = self
            .posterior
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        for p in &mut self.posterior {
            *p -= max;
        }
    }

    fn candidate_levels(&self, phi: Phi) -> Vec<f64> {
        let [p0, p1, p2] = self.function.sweet_points(phi);
        let (lower, upper) = (
            self.specifications.lower_bound,
            self.specifications.upper_bound,
        );
        [2.0 * p0 - p1, p0, p1, p2, 2.0 * p2 - p1]
            .into_iter()
            .map(|x| x.min(upper).max(lower))
            .collect()
    }

    fn record_reversal(&mut self) {
        self.reversals += 1;
        self.reversal_x.push(self.x);
        debug!(x = self.x, reversals = self.reversals, "UML reversal");
    }

    fn update(&mut self, likelihood: Vec<f64>) {
        self.add_to_posterior_and_shift_by_max(likelihood);
        self.phi = self.phi_computer.compute(self);
        self.sweet_points = self.candidate_levels(self.phi);
        self.x = self.sweet_points[self.x_candidate_index];
        self.trials += 1;
        debug!(
            x = self.x,
            candidate = self.x_candidate_index,
            trials = self.trials,
            "UML next level"
        );
    }
}

fn log_normalized(values: Vec<f64>) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    values.into_iter().map(|v| (v / sum).ln()).collect()
}

impl Track for UpdatedMaximumLikelihood {
    fn down(&mut self) {
        if self.complete() {
            return;
        }
        self.consecutive_down += 1;
        if self.consecutive_down == self.specifications.down {
            self.x_candidate_index =
                self.x_candidate_index.max(self.lowest_index() + 1) - 1;
            self.consecutive_down = 0;
            if self.direction == TrackDirection::Up {
                self.record_reversal();
            }
            self.direction = TrackDirection::Down;
        }
        self.consecutive_up = 0;

        let likelihood = self.evaluate_grid();
        self.update(likelihood);
    }

    fn up(&mut self) {
        if self.complete() {
            return;
        }
        self.consecutive_up += 1;
        if self.consecutive_up == self.specifications.up {
            self.x_candidate_index = (self.x_candidate_index + 1).min(self.highest_index());
            self.consecutive_up = 0;
            if self.direction == TrackDirection::Down {
                self.record_reversal();
            }
            self.direction = TrackDirection::Up;
        }
        self.consecutive_down = 0;

        let likelihood = self.evaluate_grid().into_iter().map(|p| 1.0 - p).collect();
        self.update(likelihood);
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn complete(&self) -> bool {
        self.trials >= self.specifications.trials
    }

    fn reversals(&self) -> usize {
        self.reversals
    }

    fn reset(&mut self) {
        self.trials = 0;
        self.consecutive_down = 0;
        self.consecutive_up = 0;
        self.direction = TrackDirection::Undefined;
        self.x = self.specifications.starting_x;
        self.reversals = 0;
        self.reversal_x.clear();

        let d = &self.distributions;
        let cells = d.alpha.len() * d.beta.len() * d.gamma.len() * d.lambda.len();
        let mut prior = Vec::with_capacity(cells);
        for &l in &d.lambda.prior {
            for &g in &d.gamma.prior {
                for &b in &d.beta.prior {
                    for &a in &d.alpha.prior {
                        prior.push(a * b * g * l);
                    }
                }
            }
        }
        self.posterior = log_normalized(prior);

        let spec = &self.specifications;
        let midpoint = (spec.lower_bound + spec.upper_bound) / 2.0;
        self.x_candidate_index = if self.x < midpoint {
            self.lowest_index()
        } else {
            self.highest_index()
        };
    }

    fn result(&self) -> Result<TrackResult> {
        Ok(TrackResult::Phi(self.phi))
    }

    fn phi(&self) -> Option<Phi> {
        Some(self.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptrack_psychometric::{
        linspace, logspace, FlatPrior, LinearNormPrior, LogNormPrior,
        LogisticPsychometricFunction,
    };
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-12;

    fn example_logistic_configuration() -> PosteriorDistributions {
        PosteriorDistributions {
            alpha: ParameterDistribution::new(linspace(-30.0, 30.0, 61), &LinearNormPrior::new(0.0, 10.0)),
            beta: ParameterDistribution::new(logspace(0.1, 10.0, 41), &LogNormPrior::new(-0.5, 0.4)),
            gamma: ParameterDistribution::new(linspace(0.02, 0.2, 11), &FlatPrior),
            lambda: ParameterDistribution::new(linspace(0.02, 0.2, 11), &FlatPrior),
        }
    }

    fn specifications(trials: usize) -> TrackSpecifications {
        TrackSpecifications {
            down: 3,
            up: 1,
            trials,
            starting_x: 30.0,
            upper_bound: 30.0,
            lower_bound: -30.0,
        }
    }

    fn example_track(trials: usize) -> UpdatedMaximumLikelihood {
        UpdatedMaximumLikelihood::new(
            example_logistic_configuration(),
            Box::new(LogisticPsychometricFunction::new()),
            Box::new(MeanPhi),
            specifications(trials),
        )
        .unwrap()
    }

    fn assert_x_after(track: &mut UpdatedMaximumLikelihood, correct: bool, expected: f64) {
        if correct {
            track.down();
        } else {
            track.up();
        }
        assert_abs_diff_eq!(track.x(), expected, epsilon = TOLERANCE);
        assert_eq!(track.reversals(), 0);
    }

    fn assert_alternating_trajectory(track: &mut UpdatedMaximumLikelihood) {
        let phi = track.phi().unwrap();
        let expected = [0.935279300498662, 0.501739472594823, 0.109708801753186, 0.137098486912143];
        for (actual, expected) in phi.to_array().into_iter().zip(expected) {
            assert_abs_diff_eq!(actual, expected, epsilon = TOLERANCE);
        }
        let expected = [
            -6.129234036864910,
            -2.625748166977760,
            0.877737702909389,
            4.407483544236620,
            7.937229385563851,
        ];
        assert_eq!(track.sweet_points().len(), 5);
        for (actual, expected) in track.sweet_points().iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = TOLERANCE);
        }
        assert_x_after(track, true, 4.242855160473956);
        assert_x_after(track, false, 9.861193730461308);
        assert_x_after(track, true, 7.537607961883664);
        assert_x_after(track, false, 11.828823619069409);
    }

    #[test]
    fn test_down_only() {
        let mut track = example_track(100);
        assert_eq!(track.x(), 30.0);
        assert_eq!(track.reversals(), 0);
        assert_x_after(&mut track, true, 6.652636329123384);
        assert_x_after(&mut track, true, 3.301128275552773);
        assert_x_after(&mut track, true, -2.377301836485305);
    }

    #[test]
    fn test_up_only() {
        let mut track = example_track(100);
        assert_eq!(track.x(), 30.0);
        assert_x_after(&mut track, false, 7.937229385563851);
        assert_x_after(&mut track, false, 14.914421286430443);
        assert_x_after(&mut track, false, 20.816765327034403);
    }

    #[test]
    fn test_alternating() {
        let mut track = example_track(100);
        assert!(track.sweet_points().is_empty());
        track.up();
        assert_alternating_trajectory(&mut track);
    }

    #[test]
    fn test_alternating_after_reset() {
        let mut track = example_track(100);
        track.up();
        track.up();
        track.down();
        track.reset();
        track.up();
        assert_alternating_trajectory(&mut track);
    }

    #[test]
    fn test_complete_after_trials() {
        let mut track = example_track(10);
        for correct in [false, false, true, false, false, true, true, false, false] {
            if correct {
                track.down();
            } else {
                track.up();
            }
        }
        assert!(!track.complete());
        track.up();
        assert!(track.complete());

        let x = track.x();
        track.down();
        assert_eq!(track.x(), x);
        assert_eq!(track.trials(), 10);

        track.reset();
        assert!(!track.complete());
    }

    #[test]
    fn test_posterior_is_normalized_after_reset() {
        let mut track = example_track(100);
        let sum: f64 = track.posterior().iter().map(|p| p.exp()).sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        assert_eq!(track.posterior().len(), 61 * 41 * 11 * 11);

        track.down();
        track.reset();
        let sum: f64 = track.posterior().iter().map(|p| p.exp()).sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_posterior_max_is_zero_after_update() {
        let mut track = example_track(100);
        track.up();
        let max = track.posterior().iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 0.0);
    }

    #[test]
    fn test_grid_lookup_varies_alpha_fastest() {
        let track = example_track(100);
        assert_eq!(
            track.grid_phi(0),
            Phi::new(-30.0, logspace(0.1, 10.0, 41)[0], 0.02, 0.02)
        );
        assert_eq!(track.alpha_space(1), -29.0);
        assert_eq!(track.beta_space(60), track.beta_space(0));
        assert_ne!(track.beta_space(61), track.beta_space(0));
        assert_eq!(track.gamma_space(61 * 41), linspace(0.02, 0.2, 11)[1]);
        assert_eq!(track.lambda_space(61 * 41 * 11), linspace(0.02, 0.2, 11)[1]);
    }

    #[test]
    fn test_empty_prior_is_rejected() {
        let mut distributions = example_logistic_configuration();
        distributions.gamma = ParameterDistribution::new(Vec::new(), &FlatPrior);
        let result = UpdatedMaximumLikelihood::new(
            distributions,
            Box::new(LogisticPsychometricFunction::new()),
            Box::new(MeanPhi),
            specifications(10),
        );
        assert!(matches!(result, Err(Error::EmptyParameterSpace("gamma"))));
    }

    #[test]
    fn test_reversal_on_direction_change() {
        let mut track = UpdatedMaximumLikelihood::new(
            example_logistic_configuration(),
            Box::new(LogisticPsychometricFunction::new()),
            Box::new(MeanPhi),
            TrackSpecifications {
                down: 1,
                ..specifications(100)
            },
        )
        .unwrap();
        track.down();
        assert_eq!(track.reversals(), 0);
        let x = track.x();
        track.up();
        assert_eq!(track.reversals(), 1);
        assert_eq!(track.reversal_history(), &[x]);
        track.down();
        assert_eq!(track.reversals(), 2);
    }

    #[test]
    fn test_maximum_posterior_phi_picks_the_prior_mode() {
        let track = example_track(100);
        let phi = MaximumPosteriorPhi.compute(&track);
        assert_eq!(phi.alpha, 0.0);
        assert_eq!(phi.gamma, 0.02);
        assert_eq!(phi.lambda, 0.02);
    }

    #[test]
    fn test_singleton_parameters_use_alpha_sweet_point() {
        let fixed = |v: f64| ParameterDistribution::new(vec![v], &FlatPrior);
        let mut track = UpdatedMaximumLikelihood::new(
            PosteriorDistributions {
                alpha: fixed(0.0),
                beta: fixed(1.0),
                gamma: fixed(0.1),
                lambda: fixed(0.1),
            },
            Box::new(LogisticPsychometricFunction::new()),
            Box::new(MeanPhi),
            specifications(100),
        )
        .unwrap();
        track.up();
        assert_eq!(track.x(), track.sweet_points()[2]);
    }

    fn small_configuration() -> PosteriorDistributions {
        PosteriorDistributions {
            alpha: ParameterDistribution::new(linspace(-20.0, 20.0, 9), &LinearNormPrior::new(0.0, 10.0)),
            beta: ParameterDistribution::new(logspace(0.1, 10.0, 5), &LogNormPrior::new(-0.5, 0.4)),
            gamma: ParameterDistribution::new(linspace(0.02, 0.2, 3), &FlatPrior),
            lambda: ParameterDistribution::new(linspace(0.02, 0.2, 3), &FlatPrior),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_x_stays_within_bounds(
            responses in proptest::collection::vec(any::<bool>(), 1..12),
            lower in -25.0f64..-5.0,
            upper in 5.0f64..25.0,
        ) {
            let mut track = UpdatedMaximumLikelihood::new(
                small_configuration(),
                Box::new(LogisticPsychometricFunction::new()),
                Box::new(MeanPhi),
                TrackSpecifications {
                    down: 2,
                    up: 1,
                    trials: 100,
                    starting_x: upper,
                    upper_bound: upper,
                    lower_bound: lower,
                },
            )
            .unwrap();
            for correct in responses {
                if correct { track.down() } else { track.up() }
                prop_assert!(track.x() >= lower && track.x() <= upper);
            }
        }
    }
}
