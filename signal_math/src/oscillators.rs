//! Momentum oscillators
//!
//! Currently holds the Wilder-smoothed Relative Strength Index used by the
//! intraday feature engine.

use crate::{MathError, Result};

/// Relative Strength Index with Wilder smoothing.
///
/// The index needs `period` price changes (`period + 1` closes) before it
/// produces a value; until then [`Rsi::update`] returns `None`. Values are
/// bounded to `[0, 100]`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    previous_close: Option<f64>,
    changes_seen: usize,
    gain_sum: f64,
    loss_sum: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl Rsi {
    /// Create a new RSI with the specified lookback period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "RSI period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            previous_close: None,
            changes_seen: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        })
    }

    /// Feed the next close and return the index value once the window is full
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let previous = match self.previous_close.replace(close) {
            Some(p) => p,
            None => return None,
        };

        let change = close - previous;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        self.changes_seen += 1;

        if self.changes_seen < self.period {
            self.gain_sum += gain;
            self.loss_sum += loss;
            return None;
        }

        if self.changes_seen == self.period {
            // Seed the smoothed averages with a simple average of the first window
            self.gain_sum += gain;
            self.loss_sum += loss;
            self.avg_gain = self.gain_sum / self.period as f64;
            self.avg_loss = self.loss_sum / self.period as f64;
        } else {
            let n = self.period as f64;
            self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
            self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
        }

        Some(self.current())
    }

    /// Latest index value, `None` while the window is still filling
    pub fn value(&self) -> Option<f64> {
        if self.changes_seen < self.period {
            None
        } else {
            Some(self.current())
        }
    }

    fn current(&self) -> f64 {
        if self.avg_loss == 0.0 {
            return 100.0;
        }
        let rs = self.avg_gain / self.avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }

    /// Lookback period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Clear all accumulated state
    pub fn reset(&mut self) {
        self.previous_close = None;
        self.changes_seen = 0;
        self.gain_sum = 0.0;
        self.loss_sum = 0.0;
        self.avg_gain = 0.0;
        self.avg_loss = 0.0;
    }
}
