//! Realized variance and rolling one-step-ahead variance forecasting
//!
//! Derived series are `Vec<Option<f64>>` aligned index-for-index with their
//! input: warm-up positions, windows interrupted by missing observations,
//! and failed fits are all `None`, never NaN.

use crate::config::StrategyConfig;
use crate::garch::{self, GarchSpec};
use rayon::prelude::*;
use signal_math::RollingVariance;
use trade_data::DailyBar;

/// Log returns of the adjusted close; the first element is absent.
///
/// Non-positive prices cannot be log-differenced and yield an absent return.
pub fn log_returns(bars: &[DailyBar]) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    for i in 1..bars.len() {
        let previous = bars[i - 1].adj_close;
        let current = bars[i].adj_close;
        if previous > 0.0 && current > 0.0 {
            out[i] = Some((current / previous).ln());
        }
    }
    out
}

/// Trailing sample variance over `window` observations ending at each index.
///
/// Any absent observation interrupts the window: positions whose trailing
/// window is not fully populated are absent.
pub fn trailing_variance(returns: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; returns.len()];
    let mut rolling = match RollingVariance::new(window) {
        Ok(r) => r,
        Err(_) => return out,
    };

    for (slot, value) in out.iter_mut().zip(returns) {
        match value {
            Some(v) => *slot = rolling.update(*v),
            None => rolling.reset(),
        }
    }

    out
}

/// Fit one trailing window and produce the next-step variance forecast.
///
/// Every failure mode degrades to `None`: rejected windows, fits that hit
/// the iteration cap without converging, and non-finite forecasts.
pub fn forecast_window(returns: &[f64], spec: &GarchSpec) -> Option<f64> {
    match garch::fit(returns, spec) {
        Ok(fit) => {
            if !fit.converged {
                log::warn!(
                    "GARCH({},{}) fit stopped after {} iterations without converging",
                    spec.p,
                    spec.q,
                    fit.iterations
                );
                return None;
            }
            let forecast = fit.forecast_variance();
            if forecast.is_finite() && forecast >= 0.0 {
                Some(forecast)
            } else {
                log::warn!("discarding non-finite variance forecast");
                None
            }
        }
        Err(err) => {
            log::debug!("GARCH window rejected: {err}");
            None
        }
    }
}

/// One-step-ahead variance forecasts from independent per-window refits.
///
/// The forecast recorded at index t uses only the `window` returns ending
/// at t; each window is refit from scratch. Fits run on the rayon pool and
/// are reassembled in input order, so the output does not depend on
/// scheduling.
pub fn rolling_garch_forecast(
    returns: &[Option<f64>],
    window: usize,
    spec: &GarchSpec,
) -> Vec<Option<f64>> {
    (0..returns.len())
        .into_par_iter()
        .map(|t| {
            if t + 1 < window {
                return None;
            }
            let mut observed = Vec::with_capacity(window);
            for value in &returns[t + 1 - window..=t] {
                match value {
                    Some(v) => observed.push(*v),
                    None => return None,
                }
            }
            forecast_window(&observed, spec)
        })
        .collect()
}

/// Convenience wrapper: both realized and forecast variance series for a
/// daily bar series under one configuration.
pub fn variance_series(
    bars: &[DailyBar],
    config: &StrategyConfig,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let returns = log_returns(bars);
    let trailing = trailing_variance(&returns, config.variance_window);
    let forecast = rolling_garch_forecast(&returns, config.variance_window, &config.garch);
    (returns, trailing, forecast)
}
