use chrono::{Duration, NaiveDate};
use rstest::rstest;
use trade_data::DailyBar;
use vol_fade::signal::{bias_by_date, build_daily_signals};
use vol_fade::{DailyBiasRule, GarchSpec, StrategyConfig};

fn test_config(variance_window: usize, bias_rule: DailyBiasRule) -> StrategyConfig {
    StrategyConfig {
        variance_window,
        garch: GarchSpec::order(1, 1),
        bias_rule,
        ..StrategyConfig::default()
    }
}

// Smooth price series with enough variation for window fits to succeed
fn wavy_bars(len: usize) -> Vec<DailyBar> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    (0..len)
        .map(|i| {
            let close = 100.0 * (1.0 + 0.02 * ((i as f64) * 0.8).sin());
            let open = 100.0 * (1.0 + 0.02 * ((i as f64) * 0.8 + 0.4).sin());
            DailyBar {
                date: start + Duration::days(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                adj_close: close,
                volume: 1_000_000.0,
            }
        })
        .collect()
}

fn flat_bars(len: usize) -> Vec<DailyBar> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    (0..len)
        .map(|i| DailyBar {
            date: start + Duration::days(i as i64),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            adj_close: 100.0,
            volume: 1_000_000.0,
        })
        .collect()
}

#[test]
fn derived_fields_honor_their_warm_up() {
    let bars = wavy_bars(40);
    let config = test_config(12, DailyBiasRule::OhlcSign);
    let signals = build_daily_signals(&bars, &config).unwrap();

    assert_eq!(signals.len(), 40);
    assert_eq!(signals[0].log_return, None);
    assert!(signals[1].log_return.is_some());

    for signal in &signals[..12] {
        assert_eq!(signal.trailing_variance, None);
        assert_eq!(signal.forecast_variance, None);
        assert_eq!(signal.prediction_premium, None);
    }
    assert!(signals[12].trailing_variance.is_some());
    assert!(signals
        .iter()
        .any(|s| s.forecast_variance.is_some()));

    for signal in &signals {
        if let Some(v) = signal.trailing_variance {
            assert!(v >= 0.0);
        }
        if let Some(v) = signal.forecast_variance {
            assert!(v >= 0.0);
        }
        // Premium is defined exactly when both variance fields are, given a
        // positive trailing variance
        let expected = signal.forecast_variance.is_some()
            && signal.trailing_variance.map(|t| t > 0.0).unwrap_or(false);
        assert_eq!(signal.prediction_premium.is_some(), expected);
    }
}

#[rstest]
#[case(DailyBiasRule::OhlcSign)]
#[case(DailyBiasRule::PremiumSign)]
fn bias_comes_from_the_configured_rule_only(#[case] rule: DailyBiasRule) {
    let bars = wavy_bars(40);
    let config = test_config(12, rule);
    let signals = build_daily_signals(&bars, &config).unwrap();

    for (bar, signal) in bars.iter().zip(&signals) {
        match rule {
            DailyBiasRule::OhlcSign => {
                let expected = if bar.close > bar.open { 1 } else { -1 };
                assert_eq!(signal.bias, Some(expected));
            }
            DailyBiasRule::PremiumSign => match signal.prediction_premium {
                Some(p) if p > 0.0 => assert_eq!(signal.bias, Some(1)),
                Some(p) if p < 0.0 => assert_eq!(signal.bias, Some(-1)),
                _ => assert_eq!(signal.bias, None),
            },
        }
    }
}

#[test]
fn ohlc_tie_counts_as_down() {
    let bars = flat_bars(15);
    let config = test_config(12, DailyBiasRule::OhlcSign);
    let signals = build_daily_signals(&bars, &config).unwrap();
    assert!(signals.iter().all(|s| s.bias == Some(-1)));
}

#[test]
fn flat_series_produces_no_usable_dates() {
    // Zero variance windows cannot support a variance forecast
    let bars = flat_bars(30);
    let config = test_config(12, DailyBiasRule::OhlcSign);
    let signals = build_daily_signals(&bars, &config).unwrap();

    assert!(signals.iter().all(|s| !s.is_usable()));
    assert!(bias_by_date(&signals).is_empty());
}

#[test]
fn bias_map_holds_only_usable_dates() {
    let bars = wavy_bars(40);
    let config = test_config(12, DailyBiasRule::OhlcSign);
    let signals = build_daily_signals(&bars, &config).unwrap();
    let map = bias_by_date(&signals);

    let usable = signals.iter().filter(|s| s.is_usable()).count();
    assert_eq!(map.len(), usable);

    // Nothing inside the warm-up range can be usable
    let first_possible = bars[12].date;
    assert!(map.keys().all(|date| *date >= first_possible));
}

#[test]
fn unsorted_dates_are_rejected() {
    let mut bars = wavy_bars(20);
    bars.swap(3, 4);
    let config = test_config(12, DailyBiasRule::OhlcSign);
    assert!(build_daily_signals(&bars, &config).is_err());
}

#[test]
fn truncating_the_future_does_not_change_past_signals() {
    let bars = wavy_bars(40);
    let config = test_config(12, DailyBiasRule::OhlcSign);

    let full = build_daily_signals(&bars, &config).unwrap();
    let truncated = build_daily_signals(&bars[..30], &config).unwrap();

    assert_eq!(&full[..30], &truncated[..]);
}
