//! Daily bias construction
//!
//! Turns a daily bar series into a per-date directional bias by way of the
//! prediction premium: the relative gap between the model's next-day
//! variance forecast and trailing realized variance.

use crate::config::{DailyBiasRule, StrategyConfig};
use crate::error::{Result, StrategyError};
use crate::volatility;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use trade_data::DailyBar;

/// One daily bar enriched with derived volatility fields and the bias
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySignal {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Log return of the adjusted close over the previous session
    pub log_return: Option<f64>,
    /// Trailing realized variance of the log returns
    pub trailing_variance: Option<f64>,
    /// Model forecast of the next session's variance, recorded at this date
    pub forecast_variance: Option<f64>,
    /// (forecast − trailing) / trailing; requires a positive trailing variance
    pub prediction_premium: Option<f64>,
    /// Directional bias for the session, per the configured rule
    pub bias: Option<i8>,
}

impl DailySignal {
    /// Whether this date may feed the fusion stage: both variance fields and
    /// the bias must be present.
    pub fn is_usable(&self) -> bool {
        self.trailing_variance.is_some() && self.forecast_variance.is_some() && self.bias.is_some()
    }
}

/// Derive the full daily signal series from daily bars.
///
/// Dates must be strictly ascending. Each derived field is absent until its
/// own warm-up is satisfied; the bias source is fixed by
/// [`StrategyConfig::bias_rule`] and never mixed.
pub fn build_daily_signals(
    bars: &[DailyBar],
    config: &StrategyConfig,
) -> Result<Vec<DailySignal>> {
    config.validate()?;
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(StrategyError::Data(format!(
                "daily bars must be strictly ascending by date, {} follows {}",
                pair[1].date, pair[0].date
            )));
        }
    }

    let (returns, trailing, forecast) = volatility::variance_series(bars, config);

    let mut signals = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let premium = match (forecast[i], trailing[i]) {
            (Some(f), Some(t)) if t > 0.0 => Some((f - t) / t),
            _ => None,
        };

        let bias = match config.bias_rule {
            DailyBiasRule::OhlcSign => Some(if bar.close > bar.open { 1 } else { -1 }),
            DailyBiasRule::PremiumSign => premium.and_then(|p| {
                if p > 0.0 {
                    Some(1)
                } else if p < 0.0 {
                    Some(-1)
                } else {
                    None
                }
            }),
        };

        signals.push(DailySignal {
            date: bar.date,
            log_return: returns[i],
            trailing_variance: trailing[i],
            forecast_variance: forecast[i],
            prediction_premium: premium,
            bias,
        });
    }

    Ok(signals)
}

/// Collect the usable dates into the date-to-bias map consumed by fusion.
pub fn bias_by_date(signals: &[DailySignal]) -> BTreeMap<NaiveDate, i8> {
    signals
        .iter()
        .filter(|s| s.is_usable())
        .filter_map(|s| s.bias.map(|b| (s.date, b)))
        .collect()
}
