//! Volatility measures
//!
//! Moving-average price bands and a rolling sample variance, both windowed
//! and reporting `None` until their window is full.

use crate::{MathError, Result};
use serde::Serialize;
use std::collections::VecDeque;

/// One evaluation of the volatility bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandSnapshot {
    /// Moving average minus `multiplier` standard deviations
    pub lower: f64,
    /// Moving average of the window
    pub middle: f64,
    /// Moving average plus `multiplier` standard deviations
    pub upper: f64,
}

/// Price envelope built from a simple moving average and a multiple of the
/// rolling population standard deviation.
#[derive(Debug, Clone)]
pub struct VolatilityBands {
    period: usize,
    multiplier: f64,
    closes: VecDeque<f64>,
}

impl VolatilityBands {
    /// Create new bands over `period` closes, `multiplier` deviations wide
    pub fn new(period: usize, multiplier: f64) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "band period must be at least two".to_string(),
            ));
        }
        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(MathError::InvalidInput(
                "band multiplier must be positive and finite".to_string(),
            ));
        }

        Ok(Self {
            period,
            multiplier,
            closes: VecDeque::with_capacity(period),
        })
    }

    /// Feed the next close and return the bands once the window is full
    pub fn update(&mut self, close: f64) -> Option<BandSnapshot> {
        self.closes.push_back(close);
        if self.closes.len() > self.period {
            self.closes.pop_front();
        }
        if self.closes.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mean = self.closes.iter().sum::<f64>() / n;
        let variance = self
            .closes
            .iter()
            .map(|c| {
                let d = c - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let width = self.multiplier * variance.sqrt();

        Some(BandSnapshot {
            lower: mean - width,
            middle: mean,
            upper: mean + width,
        })
    }

    /// Lookback period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Standard deviation multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Clear all accumulated state
    pub fn reset(&mut self) {
        self.closes.clear();
    }
}

/// Rolling sample variance (n − 1 denominator) over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingVariance {
    period: usize,
    values: VecDeque<f64>,
}

impl RollingVariance {
    /// Create a new rolling variance over `period` observations
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "variance period must be at least two".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Feed the next observation and return the variance once the window is full
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
        if self.values.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let sum_sq = self
            .values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>();

        Some(sum_sq / (n - 1.0))
    }

    /// Lookback period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Clear all accumulated state, restarting the warm-up
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bands_warm_up_and_ordering() {
        let mut bands = VolatilityBands::new(3, 2.0).unwrap();

        assert!(bands.update(10.0).is_none());
        assert!(bands.update(11.0).is_none());

        let snapshot = bands.update(9.0).unwrap();
        assert_relative_eq!(snapshot.middle, 10.0, epsilon = 1e-12);
        assert!(snapshot.upper > snapshot.middle);
        assert!(snapshot.lower < snapshot.middle);

        // Population std of [10, 11, 9] is sqrt(2/3)
        let expected = 2.0 * (2.0f64 / 3.0).sqrt();
        assert_relative_eq!(snapshot.upper - snapshot.middle, expected, epsilon = 1e-12);
    }

    #[test]
    fn bands_collapse_on_constant_prices() {
        let mut bands = VolatilityBands::new(3, 2.0).unwrap();
        bands.update(5.0);
        bands.update(5.0);
        let snapshot = bands.update(5.0).unwrap();
        assert_relative_eq!(snapshot.lower, snapshot.upper, epsilon = 1e-12);
    }

    #[test]
    fn bands_reject_bad_parameters() {
        assert!(VolatilityBands::new(1, 2.0).is_err());
        assert!(VolatilityBands::new(20, 0.0).is_err());
        assert!(VolatilityBands::new(20, f64::NAN).is_err());
    }

    #[test]
    fn rolling_variance_matches_sample_formula() {
        let mut var = RollingVariance::new(3).unwrap();

        assert!(var.update(10.0).is_none());
        assert!(var.update(20.0).is_none());

        // Sample variance of [10, 20, 30] is 100
        let v = var.update(30.0).unwrap();
        assert_relative_eq!(v, 100.0, epsilon = 1e-12);

        // Window slides to [20, 30, 40]
        let v = var.update(40.0).unwrap();
        assert_relative_eq!(v, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn rolling_variance_of_constant_series_is_zero() {
        let mut var = RollingVariance::new(4).unwrap();
        let mut last = None;
        for _ in 0..6 {
            last = var.update(2.5);
        }
        assert_relative_eq!(last.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_restarts_warm_up() {
        let mut var = RollingVariance::new(2).unwrap();
        var.update(1.0);
        assert!(var.update(2.0).is_some());

        var.reset();
        assert!(var.update(3.0).is_none());
    }
}
