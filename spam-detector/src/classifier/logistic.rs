//! Binary logistic regression
//!
//! Minimizes the L2-regularized negative log-likelihood
//! `0.5 * |w|^2 + C * sum(log(1 + exp(-y * (w.x + b))))` with L-BFGS.
//! The intercept is not penalized. Optimization starts from zero and uses
//! no randomness, so fitting is deterministic.

use std::collections::VecDeque;
use tracing::{debug, warn};

use super::tfidf::SparseVector;
use crate::config::ModelConfig;
use crate::error::{DetectorError, Result};

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// L-BFGS correction pair `(s, y, 1 / s.y)`
type Correction = (Vec<f64>, Vec<f64>, f64);

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iterations: usize,
    /// Stop once the largest gradient component is at or below this value
    pub tolerance: f64,
    /// Number of L-BFGS correction pairs
    pub history: usize,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iterations: 100,
            tolerance: 1e-4,
            history: 10,
        }
    }
}

impl From<&ModelConfig> for LogisticParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            c: config.c,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
            history: config.history,
        }
    }
}

/// Outcome of an optimization run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub iterations: usize,
    pub loss: f64,
    pub converged: bool,
}

/// Fitted linear decision boundary
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Fit on sparse feature vectors of dimension `dimension`.
    /// `targets[i]` is true for the positive class.
    pub fn fit(
        features: &[SparseVector],
        targets: &[bool],
        dimension: usize,
        params: &LogisticParams,
    ) -> Result<(Self, FitSummary)> {
        if features.is_empty() {
            return Err(DetectorError::EmptyCorpus);
        }
        if features.len() != targets.len() {
            return Err(DetectorError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }

        let objective = Objective {
            features,
            targets,
            dimension,
            c: params.c,
        };
        let (theta, summary) = minimize(&objective, dimension + 1, params);

        if !summary.converged {
            warn!(
                "Logistic regression did not converge in {} iterations (loss {:.6})",
                summary.iterations, summary.loss
            );
        }

        let intercept = theta[dimension];
        let mut weights = theta;
        weights.truncate(dimension);

        Ok((Self { weights, intercept }, summary))
    }

    /// Raw decision value `w.x + b`
    pub fn decision_function(&self, x: &SparseVector) -> f64 {
        x.dot(&self.weights) + self.intercept
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, x: &SparseVector) -> f64 {
        sigmoid(self.decision_function(x))
    }

    pub fn predict(&self, x: &SparseVector) -> bool {
        self.predict_proba(x) > 0.5
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Logistic function, stable for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + exp(-m)) without overflow
fn log_loss(margin: f64) -> f64 {
    if margin > 0.0 {
        (-margin).exp().ln_1p()
    } else {
        -margin + margin.exp().ln_1p()
    }
}

struct Objective<'a> {
    features: &'a [SparseVector],
    targets: &'a [bool],
    dimension: usize,
    c: f64,
}

impl Objective<'_> {
    /// Loss and gradient at `theta` (weights followed by intercept)
    fn evaluate(&self, theta: &[f64]) -> (f64, Vec<f64>) {
        let weights = &theta[..self.dimension];
        let intercept = theta[self.dimension];

        let mut grad = vec![0.0; self.dimension + 1];
        let mut data_loss = 0.0;

        for (x, &positive) in self.features.iter().zip(self.targets) {
            let y = if positive { 1.0 } else { -1.0 };
            let margin = y * (x.dot(weights) + intercept);
            data_loss += log_loss(margin);

            let coef = -y * sigmoid(-margin) * self.c;
            for &(index, value) in x.entries() {
                grad[index] += coef * value;
            }
            grad[self.dimension] += coef;
        }

        let mut penalty = 0.0;
        for (g, w) in grad.iter_mut().zip(weights) {
            *g += w;
            penalty += w * w;
        }

        (self.c * data_loss + 0.5 * penalty, grad)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
}

/// Limited-memory BFGS with a backtracking Armijo line search
fn minimize(
    objective: &Objective<'_>,
    size: usize,
    params: &LogisticParams,
) -> (Vec<f64>, FitSummary) {
    let mut theta = vec![0.0; size];
    let (mut loss, mut grad) = objective.evaluate(&theta);
    let mut corrections: VecDeque<Correction> = VecDeque::with_capacity(params.history);

    if max_abs(&grad) <= params.tolerance {
        return (
            theta,
            FitSummary {
                iterations: 0,
                loss,
                converged: true,
            },
        );
    }

    for iteration in 1..=params.max_iterations {
        let mut direction = two_loop(&grad, &corrections);
        let mut slope = dot(&grad, &direction);
        if slope >= 0.0 {
            corrections.clear();
            direction = grad.iter().map(|g| -g).collect();
            slope = dot(&grad, &direction);
        }

        // Without curvature information, scale the first step to unit length
        let mut step = if corrections.is_empty() {
            1.0 / dot(&direction, &direction).sqrt().max(1.0)
        } else {
            1.0
        };

        let mut accepted = None;
        for _ in 0..MAX_BACKTRACKS {
            let candidate: Vec<f64> = theta
                .iter()
                .zip(&direction)
                .map(|(t, d)| t + step * d)
                .collect();
            let (candidate_loss, candidate_grad) = objective.evaluate(&candidate);
            if candidate_loss <= loss + ARMIJO * step * slope {
                accepted = Some((candidate, candidate_loss, candidate_grad));
                break;
            }
            step *= 0.5;
        }

        let Some((next, next_loss, next_grad)) = accepted else {
            debug!("Line search failed at iteration {}", iteration);
            return (
                theta,
                FitSummary {
                    iterations: iteration,
                    loss,
                    converged: max_abs(&grad) <= params.tolerance,
                },
            );
        };

        let s: Vec<f64> = next.iter().zip(&theta).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = next_grad.iter().zip(&grad).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > 1e-10 {
            if corrections.len() == params.history {
                corrections.pop_front();
            }
            corrections.push_back((s, y, 1.0 / sy));
        }

        theta = next;
        loss = next_loss;
        grad = next_grad;

        let grad_norm = max_abs(&grad);
        debug!(
            "L-BFGS iteration {}: loss {:.6}, |grad| {:.3e}",
            iteration, loss, grad_norm
        );

        if grad_norm <= params.tolerance {
            return (
                theta,
                FitSummary {
                    iterations: iteration,
                    loss,
                    converged: true,
                },
            );
        }
    }

    (
        theta,
        FitSummary {
            iterations: params.max_iterations,
            loss,
            converged: false,
        },
    )
}

/// Approximate `-H^-1 g` from the stored correction pairs
fn two_loop(grad: &[f64], corrections: &VecDeque<Correction>) -> Vec<f64> {
    let mut q = grad.to_vec();
    let mut alphas = Vec::with_capacity(corrections.len());

    for (s, y, rho) in corrections.iter().rev() {
        let alpha = rho * dot(s, &q);
        for (qi, yi) in q.iter_mut().zip(y) {
            *qi -= alpha * yi;
        }
        alphas.push(alpha);
    }

    if let Some((s, y, _)) = corrections.back() {
        let gamma = dot(s, y) / dot(y, y);
        for qi in q.iter_mut() {
            *qi *= gamma;
        }
    }

    for ((s, y, rho), alpha) in corrections.iter().zip(alphas.iter().rev()) {
        let beta = rho * dot(y, &q);
        for (qi, si) in q.iter_mut().zip(s) {
            *qi += (alpha - beta) * si;
        }
    }

    q.iter().map(|v| -v).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Vec<SparseVector>, Vec<bool>) {
        let features = vec![
            SparseVector::from_entries(vec![(0, 1.0)]),
            SparseVector::from_entries(vec![(0, 0.8), (2, 0.6)]),
            SparseVector::from_entries(vec![(1, 1.0)]),
            SparseVector::from_entries(vec![(1, 0.6), (2, 0.8)]),
        ];
        let targets = vec![true, true, false, false];
        (features, targets)
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }

    #[test]
    fn test_log_loss_is_stable() {
        assert!((log_loss(0.0) - 2f64.ln()).abs() < 1e-12);
        assert!(log_loss(1000.0) >= 0.0);
        assert!((log_loss(-1000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_separates_toy_data() {
        let (features, targets) = toy();
        let (model, summary) =
            LogisticRegression::fit(&features, &targets, 3, &LogisticParams::default()).unwrap();

        assert!(summary.converged);
        assert!(model.weights()[0] > 0.0);
        assert!(model.weights()[1] < 0.0);
        for (x, &positive) in features.iter().zip(&targets) {
            assert_eq!(model.predict(x), positive);
        }
    }

    #[test]
    fn test_gradient_vanishes_at_optimum() {
        let (features, targets) = toy();
        let params = LogisticParams {
            tolerance: 1e-6,
            max_iterations: 500,
            ..LogisticParams::default()
        };
        let (model, _) = LogisticRegression::fit(&features, &targets, 3, &params).unwrap();

        let objective = Objective {
            features: &features,
            targets: &targets,
            dimension: 3,
            c: params.c,
        };
        let mut theta = model.weights().to_vec();
        theta.push(model.intercept());
        let (_, grad) = objective.evaluate(&theta);
        assert!(max_abs(&grad) <= 1e-5);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, targets) = toy();
        let params = LogisticParams::default();
        let (first, _) = LogisticRegression::fit(&features, &targets, 3, &params).unwrap();
        let (second, _) = LogisticRegression::fit(&features, &targets, 3, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_vector_uses_intercept() {
        let (features, targets) = toy();
        let (model, _) =
            LogisticRegression::fit(&features, &targets, 3, &LogisticParams::default()).unwrap();
        let p = model.predict_proba(&SparseVector::default());
        assert!((p - sigmoid(model.intercept())).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_inputs_are_rejected() {
        let (features, _) = toy();
        let result = LogisticRegression::fit(&features, &[true], 3, &LogisticParams::default());
        assert!(matches!(result, Err(DetectorError::Training(_))));
        assert!(matches!(
            LogisticRegression::fit(&[], &[], 3, &LogisticParams::default()),
            Err(DetectorError::EmptyCorpus)
        ));
    }
}
