//! Adaptive test configuration and its key/value text form.
//!
//! A test-settings document is a list of `label: value` lines. Each pair is
//! fed to [`AdaptiveTest::configure`]; [`AdaptiveTest::write`] produces the
//! same labels back for the session record.

use crate::Result;
use adaptrack_core::{
    LocalUrl, ParameterSpace, PhiParameterSetting, PriorProbabilityKind, TrackMethod,
    TrackSettings, TrackingRule, TrackingSequence, UmlSettings,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Everything needed to start an adaptive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveTest {
    pub targets_url: LocalUrl,
    pub starting_snr: f64,
    pub ceiling_snr: f64,
    pub floor_snr: f64,
    pub bump_limit: usize,
    pub threshold_reversals: usize,
    pub rule: TrackingRule,
    pub method: TrackMethod,
    /// UML parameters, kept while the Levitt method is selected so a later
    /// `"uml"` key picks them up.
    pub uml: UmlSettings,
}

impl Default for AdaptiveTest {
    fn default() -> Self {
        Self {
            targets_url: LocalUrl::default(),
            starting_snr: 0.0,
            ceiling_snr: 20.0,
            floor_snr: -40.0,
            bump_limit: 10,
            threshold_reversals: 0,
            rule: TrackingRule::new(),
            method: TrackMethod::Levitt,
            uml: UmlSettings::default(),
        }
    }
}

impl AdaptiveTest {
    /// Settings handed to the track factory for every playlist.
    pub fn track_settings(&self) -> TrackSettings {
        TrackSettings {
            rule: self.rule.clone(),
            starting_x: self.starting_snr,
            ceiling: self.ceiling_snr,
            floor: self.floor_snr,
            bump_limit: self.bump_limit,
            threshold_reversals: self.threshold_reversals,
        }
    }

    /// Method with the current UML parameters applied.
    pub fn track_method(&self) -> TrackMethod {
        match self.method {
            TrackMethod::Levitt => TrackMethod::Levitt,
            TrackMethod::Uml(_) => TrackMethod::Uml(self.uml),
        }
    }

    /// Apply one `label: value` pair. Unknown labels are ignored.
    pub fn configure(&mut self, key: &str, value: &str) {
        match key {
            "targets" => self.targets_url = LocalUrl::new(value.trim()),
            "starting SNR (dB)" => self.starting_snr = number(key, value),
            "ceiling SNR (dB)" => self.ceiling_snr = number(key, value),
            "floor SNR (dB)" => self.floor_snr = number(key, value),
            "track bump limit" => self.bump_limit = number(key, value),
            "threshold" | "threshold reversals" => self.threshold_reversals = number(key, value),
            "up" => {
                self.assign_to_rule(key, value, |s, v| s.up = v as usize);
                self.uml.up = number(key, first_token(value));
            }
            "down" => {
                self.assign_to_rule(key, value, |s, v| s.down = v as usize);
                self.uml.down = number(key, first_token(value));
            }
            "reversals per step size" => {
                self.assign_to_rule(key, value, |s, v| s.run_count = v as usize)
            }
            "step sizes (dB)" => self.assign_to_rule(key, value, |s, v| s.step_size = v),
            "alpha space" => parameter_space(&mut self.uml.alpha, value),
            "alpha prior" => parameter_prior(&mut self.uml.alpha, value),
            "beta space" => parameter_space(&mut self.uml.beta, value),
            "beta prior" => parameter_prior(&mut self.uml.beta, value),
            "gamma space" => parameter_space(&mut self.uml.gamma, value),
            "gamma prior" => parameter_prior(&mut self.uml.gamma, value),
            "lambda space" => parameter_space(&mut self.uml.lambda, value),
            "lambda prior" => parameter_prior(&mut self.uml.lambda, value),
            "trials" => self.uml.trials = number(key, value),
            "uml" => self.method = TrackMethod::Uml(self.uml),
            "method" => match TrackMethod::from_str(value) {
                Ok(method) => self.method = method,
                Err(e) => warn!(value, "{e}; keeping {}", self.method.name()),
            },
            _ => {}
        }
    }

    /// Grows the rule to fit `value` and assigns one number per phase.
    fn assign_to_rule(
        &mut self,
        key: &str,
        value: &str,
        assign: impl Fn(&mut TrackingSequence, f64),
    ) {
        let values = leading_numbers(key, value);
        if self.rule.len() < values.len() {
            self.rule.resize(values.len(), TrackingSequence::default());
        }
        for (sequence, &v) in self.rule.iter_mut().zip(&values) {
            assign(sequence, v);
        }
    }

    /// Emit the active settings as `label: value` lines.
    pub fn write(&self, out: &mut impl fmt::Write) -> Result<()> {
        labeled(out, "targets", &self.targets_url)?;
        labeled(out, "starting SNR (dB)", self.starting_snr)?;
        labeled(out, "ceiling SNR (dB)", self.ceiling_snr)?;
        labeled(out, "floor SNR (dB)", self.floor_snr)?;
        labeled(out, "track bump limit", self.bump_limit)?;
        labeled(out, "method", self.method.name())?;
        if self.method.is_uml() {
            let uml = &self.uml;
            for (name, parameter) in [
                ("alpha", &uml.alpha),
                ("beta", &uml.beta),
                ("gamma", &uml.gamma),
                ("lambda", &uml.lambda),
            ] {
                labeled(out, &format!("{name} space"), parameter.space)?;
                labeled(out, &format!("{name} prior"), parameter.prior)?;
            }
            labeled(out, "up", uml.up)?;
            labeled(out, "down", uml.down)?;
            labeled(out, "trials", uml.trials)?;
        } else {
            labeled(out, "up", Row(self.rule.iter().map(|s| s.up)))?;
            labeled(out, "down", Row(self.rule.iter().map(|s| s.down)))?;
            labeled(
                out,
                "reversals per step size",
                Row(self.rule.iter().map(|s| s.run_count)),
            )?;
            labeled(
                out,
                "step sizes (dB)",
                Row(self.rule.iter().map(|s| s.step_size)),
            )?;
            labeled(out, "threshold reversals", self.threshold_reversals)?;
        }
        Ok(())
    }
}

fn labeled(out: &mut impl fmt::Write, label: &str, value: impl fmt::Display) -> Result<()> {
    writeln!(out, "{label}: {value}")?;
    Ok(())
}

/// Space-separated values.
struct Row<I>(I);

impl<I> fmt::Display for Row<I>
where
    I: Iterator + Clone,
    I::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.clone().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Parses a single number, falling back to zero.
fn number<T: FromStr + Default>(key: &str, value: &str) -> T {
    value.trim().parse().unwrap_or_else(|_| {
        warn!(key, value, "unparseable number, using 0");
        T::default()
    })
}

/// UML `up`/`down` share their labels with the Levitt rule and take its
/// first value.
fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}

/// Whitespace-separated numbers up to the first token that is not one.
fn leading_numbers(key: &str, value: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    for token in value.split_whitespace() {
        match token.parse() {
            Ok(number) => numbers.push(number),
            Err(_) => {
                warn!(key, token, "unparseable number, ignoring the rest of the list");
                break;
            }
        }
    }
    numbers
}

fn parameter_space(setting: &mut PhiParameterSetting, value: &str) {
    let mut tokens = value.split_whitespace();
    match tokens.next() {
        Some("linear") => setting.space.space = ParameterSpace::Linear,
        Some("log") => setting.space.space = ParameterSpace::Log,
        _ => {}
    }
    if let Some(lower) = tokens.next().and_then(|t| t.parse().ok()) {
        setting.space.lower = lower;
    }
    if let Some(upper) = tokens.next().and_then(|t| t.parse().ok()) {
        setting.space.upper = upper;
    }
    if let Some(n) = tokens.next().and_then(|t| t.parse().ok()) {
        setting.space.n = n;
    }
}

fn parameter_prior(setting: &mut PhiParameterSetting, value: &str) {
    let mut tokens = value.split_whitespace();
    match tokens.next() {
        Some("linearnorm") => setting.prior.kind = PriorProbabilityKind::LinearNorm,
        Some("lognorm") => setting.prior.kind = PriorProbabilityKind::LogNorm,
        Some("flat") => setting.prior.kind = PriorProbabilityKind::Flat,
        _ => {}
    }
    if let Some(mu) = tokens.next().and_then(|t| t.parse().ok()) {
        setting.prior.mu = mu;
    }
    if let Some(sigma) = tokens.next().and_then(|t| t.parse().ok()) {
        setting.prior.sigma = sigma;
    }
}
