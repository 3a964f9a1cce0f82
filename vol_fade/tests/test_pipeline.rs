use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use trade_data::synthetic;
use trade_data::{DailyBar, IntradayBar};
use vol_fade::intraday::compute_features;
use vol_fade::signal::bias_by_date;
use vol_fade::{pipeline, DailyBiasRule, GarchSpec, StrategyConfig};

fn quick_config() -> StrategyConfig {
    StrategyConfig {
        variance_window: 30,
        garch: GarchSpec::order(1, 1),
        ..StrategyConfig::default()
    }
}

#[test]
fn full_run_on_synthetic_data() {
    let daily = synthetic::generate_daily_series(120, 100.0, 0.015, 11);
    let intraday = synthetic::generate_intraday_series(120, 30, 100.0, 0.002, 11);
    let config = quick_config();

    let output = pipeline::run(&daily, &intraday, &config).unwrap();

    assert_eq!(output.daily_signals.len(), 120);

    let bias = bias_by_date(&output.daily_signals);
    assert!(!bias.is_empty());

    // Every joined bar belongs to a usable session
    for bar in &output.bars {
        assert!(bias.contains_key(&bar.session_date));
    }

    // One daily return per joined session, ascending, and every equity point
    // finite
    for pair in output.daily_returns.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    assert_eq!(output.equity_curve.len(), output.daily_returns.len());
    for point in &output.equity_curve {
        assert!(point.cumulative_return.is_finite());
        assert!(point.cumulative_return > -1.0);
    }
}

#[test]
fn indicator_warm_up_produces_no_signal() {
    let intraday = synthetic::generate_intraday_series(3, 30, 100.0, 0.002, 5);
    let config = quick_config();
    let features = compute_features(&intraday, &config).unwrap();

    // RSI needs rsi_window changes, bands need band_window closes; neither
    // is satisfied inside the first twenty bars
    for feature in &features[..20] {
        assert_eq!(feature.signal, None);
    }
    assert_eq!(features[0].log_return, None);
    assert!(features[1].log_return.is_some());
}

#[test]
fn intraday_signal_is_never_both_directions() {
    let intraday = synthetic::generate_intraday_series(10, 30, 100.0, 0.004, 17);
    let config = quick_config();
    let features = compute_features(&intraday, &config).unwrap();

    for feature in &features {
        if let Some(signal) = feature.signal {
            assert!(signal == 1 || signal == -1);
            let rsi = feature.rsi.unwrap();
            if signal == 1 {
                assert!(rsi > config.rsi_overbought);
                assert!(feature.close > feature.upper_band.unwrap());
            } else {
                assert!(rsi < config.rsi_oversold);
                assert!(feature.close < feature.lower_band.unwrap());
            }
        }
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let daily = synthetic::generate_daily_series(90, 100.0, 0.012, 23);
    let intraday = synthetic::generate_intraday_series(90, 24, 100.0, 0.002, 23);
    let config = quick_config();

    let first = pipeline::run(&daily, &intraday, &config).unwrap();
    let second = pipeline::run(&daily, &intraday, &config).unwrap();

    assert_eq!(first, second);
}

#[test]
fn premium_rule_runs_end_to_end() {
    let daily = synthetic::generate_daily_series(90, 100.0, 0.015, 31);
    let intraday = synthetic::generate_intraday_series(90, 24, 100.0, 0.002, 31);
    let config = StrategyConfig {
        bias_rule: DailyBiasRule::PremiumSign,
        ..quick_config()
    };

    let output = pipeline::run(&daily, &intraday, &config).unwrap();

    for signal in &output.daily_signals {
        if signal.bias.is_some() {
            assert!(signal.prediction_premium.is_some());
        }
        if let Some(bias) = signal.bias {
            assert!(bias == 1 || bias == -1);
        }
    }
}

#[test]
fn constant_prices_produce_an_empty_backtest() {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    let daily: Vec<DailyBar> = (0..40)
        .map(|i| DailyBar {
            date: start + Duration::days(i),
            open: 50.0,
            high: 50.0,
            low: 50.0,
            close: 50.0,
            adj_close: 50.0,
            volume: 1_000.0,
        })
        .collect();
    let intraday: Vec<IntradayBar> = synthetic::generate_intraday_series(2, 25, 50.0, 0.001, 2);

    let output = pipeline::run(&daily, &intraday, &quick_config()).unwrap();

    // No variance, no forecasts, no usable bias: the join drops everything
    assert!(output.bars.is_empty());
    assert!(output.daily_returns.is_empty());
    assert!(output.equity_curve.is_empty());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let daily = synthetic::generate_daily_series(10, 100.0, 0.01, 1);
    let intraday = synthetic::generate_intraday_series(10, 10, 100.0, 0.001, 1);
    let config = StrategyConfig {
        variance_window: 1,
        ..StrategyConfig::default()
    };

    assert!(pipeline::run(&daily, &intraday, &config).is_err());
}
