//! # Trade Data
//!
//! `trade_data` supplies the two aligned market series the volatility-fade
//! pipeline consumes: daily OHLCV bars (with an adjusted close) and
//! sub-daily intraday bars. It covers loading both from CSV files and
//! generating seeded synthetic series for tests and demos.
//!
//! ## Usage Example
//!
//! ```no_run
//! use trade_data::{load_daily_csv, load_intraday_csv};
//!
//! fn main() -> trade_data::Result<()> {
//!     let daily = load_daily_csv("daily.csv")?;
//!     let intraday = load_intraday_csv("5min.csv")?;
//!     println!("{} daily bars, {} intraday bars", daily.len(), intraday.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod loader;
pub mod synthetic;

pub use loader::{load_daily_csv, load_intraday_csv};

/// Errors that can occur while loading market data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    Invalid(String),
}

/// Result type for data loading operations
pub type Result<T> = std::result::Result<T, DataError>;

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Split- and dividend-adjusted close price
    pub adj_close: f64,
    /// Volume
    pub volume: f64,
}

/// One intraday interval of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayBar {
    /// Timestamp at the start of the interval
    pub timestamp: DateTime<Utc>,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

impl IntradayBar {
    /// Calendar date of the session this bar belongs to
    pub fn session_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
