//! Single-feature multinomial logistic regression: goal differential → outcome.
//!
//! The model is refit from scratch whenever it is needed; nothing is persisted.

use crate::error::ClassifierError;
use crate::models::{Outcome, PlayedMatch};
use crate::utils::normalize::{recent_form, Role};
use serde::Serialize;

/// Solver settings. Defaults mirror a plain `LogisticRegression(max_iter=1000)`.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tolerance: f64,
    pub learning_rate: f64,
    /// Inverse regularization strength
    pub c: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-6,
            learning_rate: 0.5,
            c: 1.0,
        }
    }
}

/// Class probabilities; classes absent from training get 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    fn set(&mut self, outcome: Outcome, p: f64) {
        match outcome {
            Outcome::HomeWin => self.home_win = p,
            Outcome::Draw => self.draw = p,
            Outcome::AwayWin => self.away_win = p,
        }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away_win,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    /// Outcomes seen in training, ascending
    classes: Vec<Outcome>,
    weights: Vec<f64>,
    intercepts: Vec<f64>,
    feature_mean: f64,
    feature_scale: f64,
    iterations: usize,
    converged: bool,
}

impl OutcomeClassifier {
    pub fn fit(training: &[PlayedMatch]) -> Result<Self, ClassifierError> {
        Self::fit_with(training, FitOptions::default())
    }

    pub fn fit_with(training: &[PlayedMatch], options: FitOptions) -> Result<Self, ClassifierError> {
        let samples: Vec<(f64, Outcome)> = training
            .iter()
            .map(|m| (m.goal_diff() as f64, m.outcome()))
            .collect();
        Self::fit_samples(&samples, options)
    }

    fn fit_samples(samples: &[(f64, Outcome)], options: FitOptions) -> Result<Self, ClassifierError> {
        if samples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut classes: Vec<Outcome> = samples.iter().map(|s| s.1).collect();
        classes.sort();
        classes.dedup();

        let n = samples.len() as f64;
        let feature_mean = samples.iter().map(|s| s.0).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|s| (s.0 - feature_mean).powi(2))
            .sum::<f64>()
            / n;
        let feature_scale = if variance > 0.0 { variance.sqrt() } else { 1.0 };

        let k = classes.len();
        let mut model = Self {
            classes,
            weights: vec![0.0; k],
            intercepts: vec![0.0; k],
            feature_mean,
            feature_scale,
            iterations: 0,
            converged: k == 1,
        };

        if k == 1 {
            tracing::warn!(
                class = ?model.classes[0],
                "only one outcome in training data, predicting it unconditionally"
            );
            return Ok(model);
        }

        let targets: Vec<usize> = samples
            .iter()
            .map(|s| model.class_index(s.1).unwrap_or(0))
            .collect();
        let xs: Vec<f64> = samples.iter().map(|s| model.scale(s.0)).collect();
        // L2 on the raw-feature weight (w / scale), intercepts unpenalized
        let penalty = 1.0 / (options.c * n * feature_scale * feature_scale);

        for iteration in 1..=options.max_iter {
            let mut grad_w = vec![0.0; k];
            let mut grad_b = vec![0.0; k];

            for (&x, &target) in xs.iter().zip(&targets) {
                let probs = model.softmax_scaled(x);
                for class in 0..k {
                    let residual = probs[class] - if class == target { 1.0 } else { 0.0 };
                    grad_w[class] += residual * x / n;
                    grad_b[class] += residual / n;
                }
            }
            for class in 0..k {
                grad_w[class] += penalty * model.weights[class];
            }

            let max_grad = grad_w
                .iter()
                .chain(&grad_b)
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));

            model.iterations = iteration;
            if max_grad < options.tolerance {
                model.converged = true;
                break;
            }

            for class in 0..k {
                model.weights[class] -= options.learning_rate * grad_w[class];
                model.intercepts[class] -= options.learning_rate * grad_b[class];
            }
        }

        if model.converged {
            tracing::debug!(
                iterations = model.iterations,
                coefficients = ?model.coefficients(),
                "classifier converged"
            );
        } else {
            tracing::warn!(
                max_iter = options.max_iter,
                "classifier did not converge, using best estimate"
            );
        }

        Ok(model)
    }

    pub fn classes(&self) -> &[Outcome] {
        &self.classes
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `(class, weight, intercept)` on the unscaled goal differential.
    pub fn coefficients(&self) -> Vec<(Outcome, f64, f64)> {
        self.classes
            .iter()
            .zip(self.weights.iter().zip(&self.intercepts))
            .map(|(&class, (&w, &b))| {
                let weight = w / self.feature_scale;
                (class, weight, b - weight * self.feature_mean)
            })
            .collect()
    }

    /// Non-finite features are treated as a goal differential of 0.
    pub fn predict_proba(&self, goal_diff: f64) -> OutcomeProbabilities {
        let goal_diff = if goal_diff.is_finite() { goal_diff } else { 0.0 };
        let probs = self.softmax_scaled(self.scale(goal_diff));
        let mut out = OutcomeProbabilities::default();
        for (class, p) in self.classes.iter().zip(probs) {
            out.set(*class, p);
        }
        out
    }

    pub fn predict(&self, goal_diff: f64) -> Outcome {
        let probs = self.predict_proba(goal_diff);
        // ties resolve to the lowest class, like argmax over the sorted classes
        let mut best = self.classes[0];
        for &class in &self.classes[1..] {
            if probs.get(class) > probs.get(best) {
                best = class;
            }
        }
        best
    }

    fn class_index(&self, outcome: Outcome) -> Option<usize> {
        self.classes.iter().position(|&c| c == outcome)
    }

    fn scale(&self, x: f64) -> f64 {
        (x - self.feature_mean) / self.feature_scale
    }

    fn softmax_scaled(&self, x: f64) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w * x + b)
            .collect();
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }
}

/// The two teams picked for a prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSelection {
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPrediction {
    pub home_team: String,
    pub away_team: String,
    pub outcome: Outcome,
    /// `None` means the team had no home matches; 0.0 was used instead
    pub home_form: Option<f64>,
    /// `None` means the team had no away matches; 0.0 was used instead
    pub away_form: Option<f64>,
    pub feature: f64,
}

impl MatchupPrediction {
    pub fn label(&self) -> &'static str {
        self.outcome.label()
    }
}

/// Feature for a matchup: `home_form - (-away_form)`. Missing form counts as 0.
pub fn matchup_feature(home_form: Option<f64>, away_form: Option<f64>) -> f64 {
    let home = home_form.unwrap_or(0.0);
    let away = away_form.unwrap_or(0.0);
    home - (-away)
}

/// Predict a selected fixture from both teams' recent form.
pub fn predict_matchup(
    model: &OutcomeClassifier,
    played: &[PlayedMatch],
    selection: &MatchSelection,
) -> MatchupPrediction {
    let home_form = recent_form(played, &selection.home_team, Role::Home);
    let away_form = recent_form(played, &selection.away_team, Role::Away);
    let feature = matchup_feature(home_form, away_form);
    let outcome = model.predict(feature);

    tracing::info!(
        home = %selection.home_team,
        away = %selection.away_team,
        feature,
        ?outcome,
        "predicted matchup"
    );

    MatchupPrediction {
        home_team: selection.home_team.clone(),
        away_team: selection.away_team.clone(),
        outcome,
        home_form,
        away_form,
        feature,
    }
}
