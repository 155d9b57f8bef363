use super::models::IndexQuote;
use crate::config;
use crate::http;
use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
#[derive(Clone)]
pub struct NSEClient {
    client: Client,
    base_url: String,
    warmed_up: Arc<RwLock<bool>>,
}

impl NSEClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(config::NSE_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.into(),
            warmed_up: Arc::new(RwLock::new(false)),
        })
    }

    /// Warmup NSE session (only once per client); the API rejects requests
    /// without the cookies set by the home page.
    async fn warmup_if_needed(&self) -> Result<()> {
        if *self.warmed_up.read().await {
            return Ok(());
        }

        let mut warmed = self.warmed_up.write().await;
        if !*warmed {
            let _ = self
                .client
                .get(&self.base_url)
                .header("Accept", config::HEADER_ACCEPT_HTML)
                .send()
                .await
                .context("Failed to warm up NSE session")?;

            tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
            *warmed = true;
        }

        Ok(())
    }

    /// Last traded value of an index, e.g. "NIFTY 50".
    pub async fn fetch_index_spot(&self, index: &str) -> Result<Option<f64>> {
        self.warmup_if_needed().await?;

        let url = config::nse_index_quote_url(&self.base_url, index);
        let text = http::fetch_json(&self.client, &url, |req| {
            req.header("Referer", config::HEADER_NSE_REFERER)
                .header("X-Requested-With", config::HEADER_X_REQUESTED_WITH)
        })
        .await?;

        let quote: IndexQuote = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse index quote for {}", index))?;

        Ok(quote.data.first().and_then(|row| row.last_price))
    }
}
