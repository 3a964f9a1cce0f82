//! End-to-end pipeline
//!
//! One forward pass from raw bars to the equity curve. Nothing is cached
//! between invocations; identical inputs produce identical outputs.

use crate::backtest::{self, DailyReturn, EquityPoint, FusedBar};
use crate::config::StrategyConfig;
use crate::error::Result;
use crate::intraday;
use crate::signal::{self, DailySignal};
use serde::Serialize;
use trade_data::{DailyBar, IntradayBar};

/// Everything the pipeline produces, from daily signals to the equity curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Daily series with variance fields and the bias
    pub daily_signals: Vec<DailySignal>,
    /// Joined intraday series with positions and per-bar strategy returns
    pub bars: Vec<FusedBar>,
    /// Per-session return sums
    pub daily_returns: Vec<DailyReturn>,
    /// Compounded equity curve
    pub equity_curve: Vec<EquityPoint>,
}

/// Run the full pipeline over aligned daily and intraday series.
pub fn run(
    daily: &[DailyBar],
    intraday_bars: &[IntradayBar],
    config: &StrategyConfig,
) -> Result<PipelineOutput> {
    config.validate()?;

    let daily_signals = signal::build_daily_signals(daily, config)?;
    let bias = signal::bias_by_date(&daily_signals);
    let features = intraday::compute_features(intraday_bars, config)?;
    let outcome = backtest::fuse_and_backtest(&features, &bias)?;

    log::debug!(
        "pipeline: {} usable daily signals, {} joined bars, {} sessions",
        bias.len(),
        outcome.bars.len(),
        outcome.daily_returns.len()
    );

    Ok(PipelineOutput {
        daily_signals,
        bars: outcome.bars,
        daily_returns: outcome.daily_returns,
        equity_curve: outcome.equity_curve,
    })
}
