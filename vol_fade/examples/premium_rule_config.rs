//! Configure the pipeline from JSON and derive the daily bias from the
//! prediction premium instead of the OHLC sign.

use trade_data::synthetic;
use vol_fade::{pipeline, StrategyConfig};

const CONFIG_JSON: &str = r#"{
    "variance_window": 45,
    "garch": { "p": 1, "q": 1 },
    "bias_rule": "premium_sign"
}"#;

fn main() -> vol_fade::Result<()> {
    let config = StrategyConfig::from_json_str(CONFIG_JSON)?;

    let daily = synthetic::generate_daily_series(200, 100.0, 0.012, 9);
    let intraday = synthetic::generate_intraday_series(200, 78, 100.0, 0.0015, 9);

    let output = pipeline::run(&daily, &intraday, &config)?;

    let up = output
        .daily_signals
        .iter()
        .filter(|s| s.bias == Some(1))
        .count();
    let down = output
        .daily_signals
        .iter()
        .filter(|s| s.bias == Some(-1))
        .count();
    println!("premium bias: {up} up days, {down} down days");

    if let Some(last) = output.equity_curve.last() {
        println!(
            "cumulative return after {} sessions: {:+.4}%",
            output.equity_curve.len(),
            last.cumulative_return * 100.0
        );
    }

    Ok(())
}
