use super::models::{ChartResponse, ChartResult};
use crate::calendar::ist;
use crate::config;
use crate::http;
use crate::models::DailyBar;
use crate::signals::round2;
use crate::utility::timing::Timer;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::Client;

// -----------------------------------------------
// SECONDARY MARKET DATA (daily bars, closes)
// -----------------------------------------------
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(config::YAHOO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.into(),
        })
    }

    async fn fetch_chart(&self, ticker: &str, query: &[(&str, String)]) -> Result<ChartResult> {
        let url = config::yahoo_chart_url(&self.base_url, ticker);
        let _timer = Timer::start_with_threshold(format!("yahoo {}", ticker), 1000);

        let text = http::fetch_json(&self.client, &url, |req| req.query(query)).await?;
        let response: ChartResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse chart for {}", ticker))?;

        if let Some(err) = response.chart.error {
            anyhow::bail!("Chart error for {}: {} ({})", ticker, err.description, err.code);
        }

        response
            .chart
            .result
            .and_then(|mut results| results.pop())
            .ok_or_else(|| anyhow!("Empty chart for {}", ticker))
    }

    /// Daily bars between two dates (inclusive), oldest first.
    pub async fn fetch_daily_bars(&self, ticker: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyBar>> {
        let start = from.and_hms_opt(0, 0, 0).and_then(|t| t.and_local_timezone(ist()).single());
        let end = to.and_hms_opt(23, 59, 59).and_then(|t| t.and_local_timezone(ist()).single());
        let (Some(start), Some(end)) = (start, end) else {
            anyhow::bail!("Invalid date range {} to {}", from, to);
        };

        let chart = self
            .fetch_chart(
                ticker,
                &[
                    ("period1", start.timestamp().to_string()),
                    ("period2", end.timestamp().to_string()),
                    ("interval", "1d".to_string()),
                ],
            )
            .await?;

        let mut bars = chart.daily_bars();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Official close of the session on `date`; `None` when Yahoo has no bar for it yet.
    pub async fn fetch_close_on(&self, ticker: &str, date: NaiveDate) -> Result<Option<f64>> {
        let bars = self.fetch_daily_bars(ticker, date, date).await?;
        Ok(bars.iter().find(|b| b.date == date).map(|b| round2(b.close)))
    }

    /// Latest daily close, rounded to two decimals.
    pub async fn fetch_latest_close(&self, ticker: &str) -> Result<Option<f64>> {
        let chart = self
            .fetch_chart(
                ticker,
                &[("range", "1d".to_string()), ("interval", "1d".to_string())],
            )
            .await?;

        Ok(chart.last_close().map(round2))
    }
}
