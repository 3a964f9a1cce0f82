//! Seeded synthetic market data
//!
//! Generates geometric-Brownian daily and 5-minute series with weekday
//! session structure. Output is deterministic per seed, so tests and demos
//! can rely on exact reproducibility.

use crate::{DailyBar, IntradayBar};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// First session of every generated series (a Monday)
fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
}

/// Generate `days` daily bars starting 2021-01-04, weekdays only.
///
/// Log returns are drawn from `Normal(0, daily_vol)`; the adjusted close
/// equals the close. The same seed always yields the same series.
pub fn generate_daily_series(
    days: usize,
    base_price: f64,
    daily_vol: f64,
    seed: u64,
) -> Vec<DailyBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shock = Normal::new(0.0, sanitize_vol(daily_vol)).unwrap();

    let mut bars = Vec::with_capacity(days);
    let mut price = base_price;
    let mut date = base_date();

    while bars.len() < days {
        if date.weekday().num_days_from_monday() <= 4 {
            let ret: f64 = shock.sample(&mut rng);
            let open = price;
            let close = open * ret.exp();
            let wick = open.max(close) * 0.25 * sanitize_vol(daily_vol) * rng.gen::<f64>();
            let volume = 1_000_000.0 * (0.5 + rng.gen::<f64>());

            bars.push(DailyBar {
                date,
                open,
                high: open.max(close) + wick,
                low: (open.min(close) - wick).max(0.01),
                close,
                adj_close: close,
                volume,
            });
            price = close;
        }
        date = date.succ_opt().unwrap();
    }

    bars
}

/// Generate 5-minute bars for `days` weekday sessions starting 2021-01-04,
/// `bars_per_day` bars per session from 09:30 UTC.
///
/// Per-bar log returns are drawn from `Normal(0, bar_vol)`. Session dates
/// line up with [`generate_daily_series`] output for the same `days`, so the
/// two series join cleanly.
pub fn generate_intraday_series(
    days: usize,
    bars_per_day: usize,
    base_price: f64,
    bar_vol: f64,
    seed: u64,
) -> Vec<IntradayBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shock = Normal::new(0.0, sanitize_vol(bar_vol)).unwrap();
    let market_open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();

    let mut bars = Vec::with_capacity(days * bars_per_day);
    let mut price = base_price;
    let mut date = base_date();
    let mut sessions = 0usize;

    while sessions < days {
        if date.weekday().num_days_from_monday() <= 4 {
            for i in 0..bars_per_day {
                let time = market_open + Duration::minutes(5 * i as i64);
                let timestamp =
                    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(time), Utc);

                let ret: f64 = shock.sample(&mut rng);
                let open = price;
                let close = open * ret.exp();
                let wick = open.max(close) * 0.25 * sanitize_vol(bar_vol) * rng.gen::<f64>();
                let volume = 10_000.0 * (0.5 + rng.gen::<f64>());

                bars.push(IntradayBar {
                    timestamp,
                    open,
                    high: open.max(close) + wick,
                    low: (open.min(close) - wick).max(0.01),
                    close,
                    volume,
                });
                price = close;
            }
            sessions += 1;
        }
        date = date.succ_opt().unwrap();
    }

    bars
}

fn sanitize_vol(vol: f64) -> f64 {
    if vol.is_finite() && vol > 0.0 {
        vol
    } else {
        1e-9
    }
}
