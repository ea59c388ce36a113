//! CSV 行情加载。

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::bar::SBar;
use crate::constant::DataError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    datetime: String,
    #[serde(alias = "open_price")]
    open: f64,
    #[serde(alias = "high_price")]
    high: f64,
    #[serde(alias = "low_price")]
    low: f64,
    #[serde(alias = "close_price")]
    close: f64,
    #[serde(default)]
    volume: f64,
}

pub fn load_bars_csv(path: impl AsRef<Path>) -> Result<Vec<SBar>, DataError> {
    let reader = csv::Reader::from_path(path)?;
    read_bars(reader)
}

pub fn load_bars_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<SBar>, DataError> {
    read_bars(csv::Reader::from_reader(reader))
}

fn read_bars<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<SBar>, DataError> {
    let mut rows = Vec::new();
    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        rows.push(SBar::new(
            parse_datetime(&row.datetime)?,
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
        ));
    }
    Ok(rows)
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DataError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];
    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(DataError::InvalidDatetime(value.to_string()))
}
