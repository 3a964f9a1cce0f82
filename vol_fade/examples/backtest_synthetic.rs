//! Run the full pipeline over seeded synthetic market data and print a
//! performance summary.

use trade_data::synthetic;
use vol_fade::{metrics, pipeline, GarchSpec, StrategyConfig};

fn main() -> vol_fade::Result<()> {
    // Shorter windows than the production defaults keep the demo quick.
    let config = StrategyConfig {
        variance_window: 60,
        garch: GarchSpec::order(1, 1),
        ..StrategyConfig::default()
    };

    let daily = synthetic::generate_daily_series(250, 100.0, 0.015, 42);
    let intraday = synthetic::generate_intraday_series(250, 78, 100.0, 0.0018, 42);

    let output = pipeline::run(&daily, &intraday, &config)?;

    let forecasts = output
        .daily_signals
        .iter()
        .filter(|s| s.forecast_variance.is_some())
        .count();
    println!(
        "daily sessions: {} ({} with a variance forecast)",
        output.daily_signals.len(),
        forecasts
    );
    println!("joined intraday bars: {}", output.bars.len());

    println!("{}", metrics::evaluate(&output.daily_returns));

    for point in output.equity_curve.iter().rev().take(5).rev() {
        println!("{}  {:+.4}%", point.date, point.cumulative_return * 100.0);
    }

    Ok(())
}
