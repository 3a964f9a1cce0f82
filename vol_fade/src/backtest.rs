//! Signal fusion and hold-until-close backtest
//!
//! Joins the daily bias onto the intraday timeline, applies the
//! fade-the-breakout entry rule, carries each entry to the end of its
//! session, realizes returns one bar forward, and compounds the per-session
//! sums into an equity curve.

use crate::error::{Result, StrategyError};
use crate::intraday::BarFeatures;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One joined bar carrying position and realized return
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedBar {
    /// Timestamp at the start of the interval
    pub timestamp: DateTime<Utc>,
    /// Calendar date of the session this bar belongs to
    pub session_date: NaiveDate,
    /// Daily bias attached by the join
    pub bias: i8,
    /// Intraday signal at this bar
    pub signal: Option<i8>,
    /// Position sign after entry and session-scoped forward-fill
    pub position: Option<i8>,
    /// Log return over the previous bar
    pub log_return: Option<f64>,
    /// Log return over the *next* interval, realized by this bar's position
    pub forward_return: Option<f64>,
    /// forward_return × position; zero when either is absent
    pub strategy_return: f64,
}

/// Strategy return summed over one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReturn {
    /// Session date
    pub date: NaiveDate,
    /// Sum of strategy returns across the session's bars
    pub value: f64,
}

/// One point of the compounded equity curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    /// Session date
    pub date: NaiveDate,
    /// Compounded return since the start of the backtest
    pub cumulative_return: f64,
}

/// Full output of the fusion and backtest stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestOutcome {
    /// Joined per-bar series with positions and realized returns
    pub bars: Vec<FusedBar>,
    /// Per-session return sums
    pub daily_returns: Vec<DailyReturn>,
    /// Compounded equity curve, one point per session
    pub equity_curve: Vec<EquityPoint>,
}

/// Fuse the daily bias into the intraday series and run the backtest.
///
/// Bars whose session has no bias are dropped (inner-join semantics). The
/// entry rule fades the breakout: an up-bias overbought breakout opens a
/// short, a down-bias oversold breakdown opens a long. An entry holds until
/// the session's last bar and never crosses into the next session.
pub fn fuse_and_backtest(
    features: &[BarFeatures],
    bias_by_date: &BTreeMap<NaiveDate, i8>,
) -> Result<BacktestOutcome> {
    // Step 1: inner join on session date
    let mut bars: Vec<FusedBar> = features
        .iter()
        .filter_map(|f| {
            bias_by_date.get(&f.session_date).map(|&bias| FusedBar {
                timestamp: f.timestamp,
                session_date: f.session_date,
                bias,
                signal: f.signal,
                position: None,
                log_return: f.log_return,
                forward_return: None,
                strategy_return: 0.0,
            })
        })
        .collect();

    // Steps 2 and 3: entry rule plus last-known-value carry, reset at each
    // session boundary
    let mut current_session: Option<NaiveDate> = None;
    let mut held: Option<i8> = None;
    for bar in &mut bars {
        if current_session != Some(bar.session_date) {
            current_session = Some(bar.session_date);
            held = None;
        }

        let entry = match (bar.bias, bar.signal) {
            (1, Some(1)) => Some(-1),
            (-1, Some(-1)) => Some(1),
            _ => None,
        };
        if entry.is_some() {
            held = entry;
        }
        bar.position = held;
    }

    // Step 4: realize each position over the following interval; the last
    // bar of the series has no following interval and contributes nothing
    for i in 0..bars.len() {
        let forward = if i + 1 < bars.len() {
            bars[i + 1].log_return
        } else {
            None
        };
        let realized = match (forward, bars[i].position) {
            (Some(r), Some(p)) => r * f64::from(p),
            _ => 0.0,
        };
        bars[i].forward_return = forward;
        bars[i].strategy_return = realized;
    }

    // Step 5: per-session sums (bars arrive grouped by session already)
    let mut daily_returns: Vec<DailyReturn> = Vec::new();
    for bar in &bars {
        match daily_returns.last_mut() {
            Some(last) if last.date == bar.session_date => last.value += bar.strategy_return,
            _ => daily_returns.push(DailyReturn {
                date: bar.session_date,
                value: bar.strategy_return,
            }),
        }
    }

    // Step 6
    let equity = equity_curve(&daily_returns)?;

    Ok(BacktestOutcome {
        bars,
        daily_returns,
        equity_curve: equity,
    })
}

/// Compound daily returns into a cumulative equity curve.
///
/// `cumulative_return_t = exp(Σ ln(1 + r_τ)) − 1` over all sessions up to t.
/// A daily return at or below −100% cannot be log-compounded and surfaces
/// as [`StrategyError::InvalidReturn`].
pub fn equity_curve(daily_returns: &[DailyReturn]) -> Result<Vec<EquityPoint>> {
    let mut log_sum = 0.0;
    let mut curve = Vec::with_capacity(daily_returns.len());

    for daily in daily_returns {
        if daily.value <= -1.0 {
            return Err(StrategyError::InvalidReturn {
                date: daily.date,
                value: daily.value,
            });
        }
        log_sum += (1.0 + daily.value).ln();
        curve.push(EquityPoint {
            date: daily.date,
            cumulative_return: log_sum.exp() - 1.0,
        });
    }

    Ok(curve)
}
