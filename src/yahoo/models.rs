use crate::calendar::IST_OFFSET_SECS;
use crate::models::DailyBar;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Response of `/v8/finance/chart/{ticker}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,

    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,

    #[serde(default)]
    pub timestamp: Vec<i64>,

    pub indicators: Indicators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,

    /// Exchange offset from UTC in seconds (19800 for NSE/BSE).
    #[serde(default)]
    pub gmtoffset: Option<i32>,

    #[serde(rename = "regularMarketPrice", default)]
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Column-wise OHLC; a slot is null when the exchange printed no value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Rows with an open and a close, dated in the exchange's local time.
    pub fn daily_bars(&self) -> Vec<DailyBar> {
        let offset = FixedOffset::east_opt(self.meta.gmtoffset.unwrap_or(IST_OFFSET_SECS))
            .or_else(|| FixedOffset::east_opt(IST_OFFSET_SECS));
        let (Some(offset), Some(quote)) = (offset, self.indicators.quote.first()) else {
            return Vec::new();
        };

        let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let date = DateTime::from_timestamp(*ts, 0)?.with_timezone(&offset).date_naive();
                let open = at(&quote.open, i)?;
                let close = at(&quote.close, i)?;
                Some(DailyBar {
                    date,
                    open,
                    high: at(&quote.high, i).unwrap_or(open.max(close)),
                    low: at(&quote.low, i).unwrap_or(open.min(close)),
                    close,
                })
            })
            .collect()
    }

    /// Last printed close in the series.
    pub fn last_close(&self) -> Option<f64> {
        self.indicators
            .quote
            .first()?
            .close
            .iter()
            .rev()
            .find_map(|c| *c)
    }
}
