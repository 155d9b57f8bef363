use super::models::{collect_expiries, CandleData, OptionContract, UpstoxResponse};
use crate::config;
use crate::http;
use crate::models::{Candle, Instrument};
use crate::signals::{ltp_at_close, open_at_915};
use crate::utility::timing::Timer;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

// -----------------------------------------------
// BROKERAGE CLIENT (bearer token per call)
// -----------------------------------------------
#[derive(Clone)]
pub struct UpstoxClient {
    client: Client,
    base_url: String,
}

impl UpstoxClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(config::UPSTOX_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.into(),
        })
    }

    async fn get(&self, token: &str, url: &str) -> Result<String> {
        let _timer = Timer::start_with_threshold(format!("upstox {}", url), 1000);
        http::fetch_json(&self.client, url, |req| {
            req.header("Accept", config::HEADER_ACCEPT_JSON).bearer_auth(token)
        })
        .await
    }

    // -----------------------------------------------
    // OPTION EXPIRIES
    // -----------------------------------------------
    pub async fn fetch_expiries(&self, token: &str, instrument: Instrument) -> Result<Vec<NaiveDate>> {
        let url = config::upstox_option_contract_url(&self.base_url, instrument.index_key());
        let text = self.get(token, &url).await?;

        let response: UpstoxResponse<Vec<OptionContract>> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse option contracts for {}", instrument))?;

        let expiries = collect_expiries(&response.data);
        debug!(%instrument, count = expiries.len(), "fetched expiries");
        Ok(expiries)
    }

    // -----------------------------------------------
    // ONE-MINUTE CANDLES
    // -----------------------------------------------
    /// Today's session comes from the intraday endpoint; past sessions from
    /// the historical one.
    pub async fn fetch_minute_candles(
        &self,
        token: &str,
        instrument_key: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let url = if date == today {
            config::upstox_intraday_candles_url(&self.base_url, instrument_key)
        } else {
            config::upstox_historical_candles_url(
                &self.base_url,
                instrument_key,
                &date.format("%Y-%m-%d").to_string(),
            )
        };

        let text = self.get(token, &url).await?;
        let response: UpstoxResponse<CandleData> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse candles for {} on {}", instrument_key, date))?;

        Ok(response.data.parse())
    }

    /// 3:30 PM LTP of `date`'s session.
    pub async fn fetch_ltp_330(
        &self,
        token: &str,
        instrument_key: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<f64>> {
        let candles = self.fetch_minute_candles(token, instrument_key, date, today).await?;
        Ok(ltp_at_close(&candles))
    }

    /// 9:15 AM open of `date`'s session.
    pub async fn fetch_open_915(
        &self,
        token: &str,
        instrument_key: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<f64>> {
        let candles = self.fetch_minute_candles(token, instrument_key, date, today).await?;
        Ok(open_at_915(&candles))
    }
}
