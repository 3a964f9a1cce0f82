//! Intraday feature engine
//!
//! Runs the momentum and band indicators over the full intraday series,
//! before any join or session segmentation, and derives the per-bar
//! mean-reversion signal. Each bar's signal is evaluated independently;
//! no state is carried between bars beyond the indicator windows.

use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use signal_math::{Rsi, VolatilityBands};
use trade_data::IntradayBar;

/// One intraday bar enriched with indicators and the derived signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFeatures {
    /// Timestamp at the start of the interval
    pub timestamp: DateTime<Utc>,
    /// Calendar date of the session this bar belongs to
    pub session_date: NaiveDate,
    /// Close price of the bar
    pub close: f64,
    /// Relative strength index
    pub rsi: Option<f64>,
    /// Lower volatility band
    pub lower_band: Option<f64>,
    /// Upper volatility band
    pub upper_band: Option<f64>,
    /// Log return over the previous bar of the full series
    pub log_return: Option<f64>,
    /// +1 overbought breakout, −1 oversold breakdown, absent otherwise
    pub signal: Option<i8>,
}

/// Compute indicators and the intraday signal for every bar.
///
/// Timestamps must be strictly ascending. The signal is +1 only when the
/// RSI is above the overbought level *and* the close is above the upper
/// band; −1 only when the RSI is below the oversold level *and* the close
/// is below the lower band; absent in every other case.
pub fn compute_features(
    bars: &[IntradayBar],
    config: &StrategyConfig,
) -> Result<Vec<BarFeatures>> {
    config.validate()?;
    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(StrategyError::Data(format!(
                "intraday bars must be strictly ascending, {} follows {}",
                pair[1].timestamp, pair[0].timestamp
            )));
        }
    }

    let mut rsi = Rsi::new(config.rsi_window)?;
    let mut bands = VolatilityBands::new(config.band_window, config.band_multiplier)?;

    let mut features = Vec::with_capacity(bars.len());
    let mut previous_close: Option<f64> = None;

    for bar in bars {
        let rsi_value = rsi.update(bar.close);
        let band_values = bands.update(bar.close);

        let log_return = previous_close.and_then(|previous| {
            if previous > 0.0 && bar.close > 0.0 {
                Some((bar.close / previous).ln())
            } else {
                None
            }
        });
        previous_close = Some(bar.close);

        let signal = match (rsi_value, band_values) {
            (Some(r), Some(b)) if r > config.rsi_overbought && bar.close > b.upper => Some(1),
            (Some(r), Some(b)) if r < config.rsi_oversold && bar.close < b.lower => Some(-1),
            _ => None,
        };

        features.push(BarFeatures {
            timestamp: bar.timestamp,
            session_date: bar.session_date(),
            close: bar.close,
            rsi: rsi_value,
            lower_band: band_values.map(|b| b.lower),
            upper_band: band_values.map(|b| b.upper),
            log_return,
            signal,
        });
    }

    Ok(features)
}
