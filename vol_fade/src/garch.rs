//! Conditional-heteroskedasticity model fitting
//!
//! A constant-mean GARCH model estimated by Gaussian maximum likelihood.
//! `q` ARCH coefficients weight lagged squared innovations and `p` GARCH
//! coefficients weight lagged conditional variances:
//!
//! `h_t = ω + Σ α_i·ε²_{t−i} + Σ β_j·h_{t−j}`
//!
//! The optimizer is a plain Nelder–Mead simplex with a fixed iteration cap
//! and relative tolerance, so a fit is a pure, reproducible function of its
//! input slice. Infeasible parameter vectors (negative coefficients or
//! non-stationary persistence) are rejected by an infinite objective value.

use crate::error::{Result, StrategyError};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::cmp::Ordering;

const VARIANCE_FLOOR: f64 = 1e-12;
const MAX_PERSISTENCE: f64 = 0.999;
const LN_2PI: f64 = 1.8378770664093453;

/// Model order and fit limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarchSpec {
    /// Number of lagged conditional-variance terms (GARCH order)
    pub p: usize,
    /// Number of lagged squared-innovation terms (ARCH order)
    pub q: usize,
    /// Iteration cap for the simplex search
    pub max_iterations: usize,
    /// Relative tolerance on the objective spread that counts as converged
    pub tolerance: f64,
}

impl Default for GarchSpec {
    fn default() -> Self {
        Self {
            p: 1,
            q: 3,
            max_iterations: 1000,
            tolerance: 1e-7,
        }
    }
}

impl GarchSpec {
    /// Spec with the given order and default fit limits
    pub fn order(p: usize, q: usize) -> Self {
        Self {
            p,
            q,
            ..Self::default()
        }
    }

    /// Check the spec for usable values
    pub fn validate(&self) -> Result<()> {
        if self.p + self.q == 0 {
            return Err(StrategyError::InvalidParameter(
                "GARCH order must include at least one lag".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(StrategyError::InvalidParameter(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(StrategyError::InvalidParameter(
                "tolerance must be positive and finite".to_string(),
            ));
        }
        Ok(())
    }

    fn lag(&self) -> usize {
        self.p.max(self.q)
    }
}

/// A fitted model, ready to forecast one step ahead
#[derive(Debug, Clone)]
pub struct GarchFit {
    /// Baseline variance
    pub omega: f64,
    /// ARCH coefficients, one per lagged squared innovation
    pub alpha: Vec<f64>,
    /// GARCH coefficients, one per lagged conditional variance
    pub beta: Vec<f64>,
    /// Gaussian log-likelihood at the optimum
    pub log_likelihood: f64,
    /// Simplex iterations consumed
    pub iterations: usize,
    /// Whether the search met its tolerance within the iteration cap
    pub converged: bool,
    residuals: Vec<f64>,
    variance: Vec<f64>,
}

impl GarchFit {
    /// One-step-ahead conditional variance forecast
    pub fn forecast_variance(&self) -> f64 {
        let n = self.residuals.len();
        let mut next = self.omega;
        for (i, a) in self.alpha.iter().enumerate() {
            let e = self.residuals[n - 1 - i];
            next += a * e * e;
        }
        for (j, b) in self.beta.iter().enumerate() {
            next += b * self.variance[n - 1 - j];
        }
        next
    }

    /// Σα + Σβ; below one for a stationary model
    pub fn persistence(&self) -> f64 {
        self.alpha.iter().sum::<f64>() + self.beta.iter().sum::<f64>()
    }

    /// In-sample conditional variance path
    pub fn conditional_variance(&self) -> &[f64] {
        &self.variance
    }
}

/// Fit the model to a window of returns.
///
/// Errors on invalid specs, too-short or non-finite windows, and windows
/// with degenerate (near-zero) variance; those cannot support a meaningful
/// likelihood. Failure to *converge* is not an error; the caller inspects
/// [`GarchFit::converged`].
pub fn fit(returns: &[f64], spec: &GarchSpec) -> Result<GarchFit> {
    spec.validate()?;

    let minimum = spec.lag() + 10;
    if returns.len() < minimum {
        return Err(StrategyError::Data(format!(
            "need at least {} observations for GARCH({},{}), have {}",
            minimum,
            spec.p,
            spec.q,
            returns.len()
        )));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(StrategyError::Data(
            "non-finite return in fit window".to_string(),
        ));
    }

    let mean = returns.mean();
    let residuals: Vec<f64> = returns.iter().map(|r| r - mean).collect();
    let var0 = residuals.iter().population_variance();
    if !var0.is_finite() || var0 <= VARIANCE_FLOOR {
        return Err(StrategyError::Data(
            "degenerate fit window: variance is zero".to_string(),
        ));
    }

    // Variance-targeted starting point: modest ARCH weight, heavy GARCH
    // weight, ω scaled so the implied long-run variance matches the sample.
    let mut start = Vec::with_capacity(1 + spec.q + spec.p);
    start.push(var0 * 0.05);
    start.extend(decaying_weights(spec.q, 0.10, 0.7));
    start.extend(decaying_weights(spec.p, 0.85, 0.8));

    let objective =
        |params: &[f64]| negative_log_likelihood(params, &residuals, spec.p, spec.q, var0);
    let search = nelder_mead(
        &objective,
        &start,
        spec.max_iterations,
        spec.tolerance,
    );

    let (omega, alpha, beta) = split_params(&search.x, spec.p, spec.q);
    let variance = variance_path(omega, alpha, beta, &residuals, var0);

    log::debug!(
        "GARCH({},{}) fit: ll={:.4} iterations={} converged={}",
        spec.p,
        spec.q,
        -search.fx,
        search.iterations,
        search.converged
    );

    Ok(GarchFit {
        omega,
        alpha: alpha.to_vec(),
        beta: beta.to_vec(),
        log_likelihood: -search.fx,
        iterations: search.iterations,
        converged: search.converged,
        residuals,
        variance,
    })
}

fn split_params(params: &[f64], p: usize, q: usize) -> (f64, &[f64], &[f64]) {
    (params[0], &params[1..1 + q], &params[1 + q..1 + q + p])
}

fn variance_path(omega: f64, alpha: &[f64], beta: &[f64], residuals: &[f64], var0: f64) -> Vec<f64> {
    let n = residuals.len();
    let lag = alpha.len().max(beta.len());
    let mut h = vec![var0.max(VARIANCE_FLOOR); n];

    for t in lag..n {
        let mut ht = omega;
        for (i, a) in alpha.iter().enumerate() {
            let e = residuals[t - 1 - i];
            ht += a * e * e;
        }
        for (j, b) in beta.iter().enumerate() {
            ht += b * h[t - 1 - j];
        }
        h[t] = ht.max(VARIANCE_FLOOR);
    }

    h
}

fn negative_log_likelihood(
    params: &[f64],
    residuals: &[f64],
    p: usize,
    q: usize,
    var0: f64,
) -> f64 {
    let (omega, alpha, beta) = split_params(params, p, q);

    if omega <= 0.0 || alpha.iter().any(|a| *a < 0.0) || beta.iter().any(|b| *b < 0.0) {
        return f64::INFINITY;
    }
    if alpha.iter().sum::<f64>() + beta.iter().sum::<f64>() >= MAX_PERSISTENCE {
        return f64::INFINITY;
    }

    let h = variance_path(omega, alpha, beta, residuals, var0);
    let mut acc = 0.0;
    for (e, ht) in residuals.iter().zip(&h) {
        acc += ht.ln() + e * e / ht;
    }

    let nll = 0.5 * (acc + residuals.len() as f64 * LN_2PI);
    if nll.is_finite() {
        nll
    } else {
        f64::INFINITY
    }
}

struct SimplexResult {
    x: Vec<f64>,
    fx: f64,
    iterations: usize,
    converged: bool,
}

/// Nelder–Mead downhill simplex with standard coefficients.
///
/// Deterministic: the initial simplex perturbs each coordinate of `start`
/// by a fixed fraction, and ties in vertex ordering resolve by index.
fn nelder_mead<F>(f: &F, start: &[f64], max_iterations: usize, tolerance: f64) -> SimplexResult
where
    F: Fn(&[f64]) -> f64,
{
    const REFLECT: f64 = 1.0;
    const EXPAND: f64 = 2.0;
    const CONTRACT: f64 = 0.5;
    const SHRINK: f64 = 0.5;

    let n = start.len();
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.to_vec(), f(start)));
    for i in 0..n {
        let mut vertex = start.to_vec();
        let step = if vertex[i].abs() > 1e-12 {
            0.10 * vertex[i].abs()
        } else {
            1e-6
        };
        vertex[i] += step;
        let fx = f(&vertex);
        simplex.push((vertex, fx));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let best = simplex[0].1;
        let worst = simplex[n].1;

        if best.is_finite() && (worst - best).abs() <= tolerance * (best.abs() + tolerance) {
            converged = true;
            break;
        }

        let mut centroid = vec![0.0; n];
        for (vertex, _) in simplex.iter().take(n) {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / n as f64;
            }
        }

        let worst_x = simplex[n].0.clone();
        let reflected: Vec<f64> = centroid
            .iter()
            .zip(&worst_x)
            .map(|(c, w)| c + REFLECT * (c - w))
            .collect();
        let f_reflected = f(&reflected);

        if f_reflected < simplex[0].1 {
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(&reflected)
                .map(|(c, r)| c + EXPAND * (r - c))
                .collect();
            let f_expanded = f(&expanded);
            simplex[n] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < simplex[n - 1].1 {
            simplex[n] = (reflected, f_reflected);
        } else {
            let (contracted, f_contracted) = if f_reflected < simplex[n].1 {
                let outside: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + CONTRACT * (r - c))
                    .collect();
                let fx = f(&outside);
                (outside, fx)
            } else {
                let inside: Vec<f64> = centroid
                    .iter()
                    .zip(&worst_x)
                    .map(|(c, w)| c - CONTRACT * (c - w))
                    .collect();
                let fx = f(&inside);
                (inside, fx)
            };

            if f_contracted < simplex[n].1.min(f_reflected) {
                simplex[n] = (contracted, f_contracted);
            } else {
                let best_x = simplex[0].0.clone();
                for (vertex, fx) in simplex.iter_mut().skip(1) {
                    for (v, b) in vertex.iter_mut().zip(&best_x) {
                        *v = b + SHRINK * (*v - b);
                    }
                    *fx = f(vertex);
                }
            }
        }

        iterations += 1;
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    SimplexResult {
        x: simplex[0].0.clone(),
        fx: simplex[0].1,
        iterations,
        converged,
    }
}

fn decaying_weights(count: usize, total: f64, decay: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let mut raw = Vec::with_capacity(count);
    let mut w = 1.0;
    for _ in 0..count {
        raw.push(w);
        w *= decay;
    }

    let denominator: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / denominator * total).collect()
}
