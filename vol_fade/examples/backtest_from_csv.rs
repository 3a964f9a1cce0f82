//! Backtest real CSV inputs: a daily file with
//! `Date,Open,High,Low,Close,Adj Close,Volume` columns and an intraday file
//! with `datetime,open,high,low,close,volume` columns.
//!
//! Usage: cargo run --example backtest_from_csv -p vol_fade -- daily.csv 5min.csv

use std::env;
use trade_data::{load_daily_csv, load_intraday_csv};
use vol_fade::{metrics, pipeline, StrategyConfig};

fn main() -> vol_fade::Result<()> {
    let mut args = env::args().skip(1);
    let (daily_path, intraday_path) = match (args.next(), args.next()) {
        (Some(daily), Some(intraday)) => (daily, intraday),
        _ => {
            eprintln!("usage: backtest_from_csv <daily.csv> <intraday.csv>");
            std::process::exit(2);
        }
    };

    let daily = load_daily_csv(&daily_path)?;
    let intraday = load_intraday_csv(&intraday_path)?;
    println!(
        "loaded {} daily bars and {} intraday bars",
        daily.len(),
        intraday.len()
    );

    let config = StrategyConfig::default();
    let output = pipeline::run(&daily, &intraday, &config)?;

    println!("{}", metrics::evaluate(&output.daily_returns));
    if let Some(last) = output.equity_curve.last() {
        println!(
            "cumulative return through {}: {:+.4}%",
            last.date,
            last.cumulative_return * 100.0
        );
    }

    Ok(())
}
