//! Performance metrics over the daily return series

use crate::backtest::DailyReturn;
use statrs::statistics::Statistics;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics for a backtest run
#[derive(Debug, Clone)]
pub struct StrategyMetrics {
    /// Compounded return over the whole run
    pub total_return: f64,
    /// Total return scaled to a 252-session year
    pub annualized_return: f64,
    /// Annualized Sharpe ratio; absent when returns have no dispersion
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough loss of the compounded curve
    pub max_drawdown: f64,
    /// Share of sessions with exposure that ended positive
    pub win_rate: f64,
    /// Number of sessions in the series
    pub trading_days: usize,
}

/// Evaluate a daily return series.
///
/// `win_rate` counts only sessions with a non-zero return, so flat sessions
/// without exposure do not dilute it.
pub fn evaluate(daily_returns: &[DailyReturn]) -> StrategyMetrics {
    let values: Vec<f64> = daily_returns.iter().map(|d| d.value).collect();
    let trading_days = values.len();

    let mut equity = 1.0;
    let mut peak = 1.0;
    let mut max_drawdown = 0.0f64;
    for value in &values {
        equity *= (1.0 + value).max(0.0);
        if equity > peak {
            peak = equity;
        }
        let drawdown = (peak - equity) / peak;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }
    let total_return = equity - 1.0;

    let annualized_return = if trading_days > 0 && total_return > -1.0 {
        (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0
    } else {
        0.0
    };

    let sharpe_ratio = if trading_days > 1 {
        let mean = values.iter().mean();
        let std_dev = values.iter().std_dev();
        if std_dev > 0.0 {
            Some(mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt())
        } else {
            None
        }
    } else {
        None
    };

    let active = values.iter().filter(|v| **v != 0.0).count();
    let wins = values.iter().filter(|v| **v > 0.0).count();
    let win_rate = if active == 0 {
        0.0
    } else {
        wins as f64 / active as f64
    };

    StrategyMetrics {
        total_return,
        annualized_return,
        sharpe_ratio,
        max_drawdown,
        win_rate,
        trading_days,
    }
}

impl std::fmt::Display for StrategyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Strategy Performance:")?;
        writeln!(f, "  Total Return:      {:.2}%", self.total_return * 100.0)?;
        writeln!(
            f,
            "  Annualized Return: {:.2}%",
            self.annualized_return * 100.0
        )?;
        match self.sharpe_ratio {
            Some(sharpe) => writeln!(f, "  Sharpe Ratio:      {:.2}", sharpe)?,
            None => writeln!(f, "  Sharpe Ratio:      n/a")?,
        }
        writeln!(f, "  Max Drawdown:      {:.2}%", self.max_drawdown * 100.0)?;
        writeln!(f, "  Win Rate:          {:.2}%", self.win_rate * 100.0)?;
        writeln!(f, "  Trading Days:      {}", self.trading_days)?;
        Ok(())
    }
}
