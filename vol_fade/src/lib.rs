//! # Vol Fade
//!
//! A Rust library that estimates a volatility-driven daily trading bias,
//! fuses it with an intraday mean-reversion signal, and simulates a
//! hold-until-close strategy over the result.
//!
//! ## Pipeline
//!
//! 1. Fit a GARCH model over a rolling window of daily log returns and
//!    forecast the next session's variance, point-in-time per date.
//! 2. Compare the forecast with trailing realized variance (the prediction
//!    premium) and derive a discrete daily bias.
//! 3. Compute RSI and volatility bands over the intraday series and derive
//!    a per-bar overbought/oversold signal.
//! 4. Fade the breakout where bias and signal agree, hold the position to
//!    the session close, and compound the realized returns into an equity
//!    curve.
//!
//! Warm-up gaps, non-converged fits, and unmatched sessions are all carried
//! as explicit absent values; the only fatal data condition is a session
//! return at or below −100%, which cannot be log-compounded.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trade_data::synthetic;
//! use vol_fade::{pipeline, StrategyConfig};
//!
//! fn main() -> vol_fade::Result<()> {
//!     let daily = synthetic::generate_daily_series(400, 100.0, 0.012, 7);
//!     let intraday = synthetic::generate_intraday_series(400, 78, 100.0, 0.0015, 7);
//!
//!     let config = StrategyConfig::default();
//!     let output = pipeline::run(&daily, &intraday, &config)?;
//!
//!     if let Some(last) = output.equity_curve.last() {
//!         println!("cumulative return: {:.2}%", last.cumulative_return * 100.0);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backtest;
pub mod config;
pub mod error;
pub mod garch;
pub mod intraday;
pub mod metrics;
pub mod pipeline;
pub mod signal;
pub mod volatility;

// Re-export commonly used types
pub use crate::backtest::{BacktestOutcome, DailyReturn, EquityPoint, FusedBar};
pub use crate::config::{DailyBiasRule, StrategyConfig};
pub use crate::error::{Result, StrategyError};
pub use crate::garch::{GarchFit, GarchSpec};
pub use crate::intraday::BarFeatures;
pub use crate::metrics::StrategyMetrics;
pub use crate::pipeline::PipelineOutput;
pub use crate::signal::DailySignal;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
