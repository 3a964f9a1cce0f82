//! CSV ingestion for daily and intraday bars
//!
//! Rows whose date or timestamp cannot be parsed are dropped with a warning;
//! surviving rows are sorted ascending by time. Numeric parse failures are
//! treated as a malformed file and surfaced as errors.

use crate::{DailyBar, DataError, IntradayBar, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DailyRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close")]
    adj_close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct IntradayRecord {
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load daily bars from a CSV file with columns
/// `Date,Open,High,Low,Close,Adj Close,Volume`.
pub fn load_daily_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DailyBar>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for record in reader.deserialize() {
        let record: DailyRecord = record?;
        match parse_date(&record.date) {
            Some(date) => bars.push(DailyBar {
                date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                adj_close: record.adj_close,
                volume: record.volume,
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!("dropped {dropped} daily rows with unparseable dates");
    }
    if bars.is_empty() {
        return Err(DataError::Invalid(
            "no usable rows in daily file".to_string(),
        ));
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Load intraday bars from a CSV file with columns
/// `datetime,open,high,low,close,volume`.
pub fn load_intraday_csv<P: AsRef<Path>>(path: P) -> Result<Vec<IntradayBar>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for record in reader.deserialize() {
        let record: IntradayRecord = record?;
        match parse_timestamp(&record.datetime) {
            Some(timestamp) => bars.push(IntradayBar {
                timestamp,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume,
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!("dropped {dropped} intraday rows with unparseable timestamps");
    }
    if bars.is_empty() {
        return Err(DataError::Invalid(
            "no usable rows in intraday file".to_string(),
        ));
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn daily_loader_drops_bad_dates_and_sorts() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
        writeln!(file, "2021-01-05,101,102,100,101.5,101.5,1200").unwrap();
        writeln!(file, "not-a-date,1,1,1,1,1,1").unwrap();
        writeln!(file, "2021-01-04,100,101,99,100.5,100.5,1000").unwrap();

        let bars = load_daily_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2021, 1, 5).unwrap());
        assert!((bars[0].adj_close - 100.5).abs() < 1e-12);
    }

    #[test]
    fn intraday_loader_accepts_space_separated_timestamps() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "datetime,open,high,low,close,volume").unwrap();
        writeln!(file, "2021-01-04 09:35:00,100,101,99,100.5,500").unwrap();
        writeln!(file, "2021-01-04 09:30:00,99.5,100,99,100,400").unwrap();
        writeln!(file, "garbage,1,1,1,1,1").unwrap();

        let bars = load_intraday_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(
            bars[0].session_date(),
            NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
        );
    }

    #[test]
    fn empty_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
        writeln!(file, "bad,1,1,1,1,1,1").unwrap();

        assert!(load_daily_csv(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_daily_csv("/nonexistent/daily.csv");
        assert!(result.is_err());
    }
}
