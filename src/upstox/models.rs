use crate::models::Candle;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope of every Upstox v2 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstoxResponse<T> {
    pub status: String,
    pub data: T,
}

/// One option contract from `/v2/option/contract`; only the expiry matters here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    #[serde(default)]
    pub expiry: Option<String>,

    #[serde(default)]
    pub instrument_key: Option<String>,

    #[serde(default)]
    pub strike_price: Option<f64>,
}

/// `data` of the historical/intraday candle endpoints.
///
/// Candles arrive as positional arrays:
/// `[timestamp, open, high, low, close, volume, open_interest]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleData {
    #[serde(default)]
    pub candles: Vec<Vec<Value>>,
}

impl CandleData {
    /// Typed candles; malformed rows are skipped.
    pub fn parse(&self) -> Vec<Candle> {
        self.candles.iter().filter_map(|row| parse_candle(row)).collect()
    }
}

pub fn parse_candle(row: &[Value]) -> Option<Candle> {
    let timestamp = DateTime::parse_from_rfc3339(row.first()?.as_str()?).ok()?;
    let num = |i: usize| row.get(i).and_then(Value::as_f64);

    Some(Candle {
        timestamp: timestamp.naive_local(),
        open: num(1)?,
        high: num(2)?,
        low: num(3)?,
        close: num(4)?,
        volume: num(5).unwrap_or(0.0),
    })
}

/// Sorted, de-duplicated expiry dates; unparseable entries are dropped.
pub fn collect_expiries(contracts: &[OptionContract]) -> Vec<NaiveDate> {
    let mut expiries: Vec<NaiveDate> = contracts
        .iter()
        .filter_map(|c| c.expiry.as_deref())
        .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .collect();
    expiries.sort();
    expiries.dedup();
    expiries
}
