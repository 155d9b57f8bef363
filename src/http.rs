use crate::config;
use anyhow::{anyhow, Context, Result};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
pub fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Outcome of a failed attempt: worth retrying or not.
enum AttemptError {
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

impl AttemptError {
    fn into_inner(self) -> anyhow::Error {
        match self {
            AttemptError::Retryable(e) | AttemptError::Fatal(e) => e,
        }
    }
}

/// GET with retry on transport errors, 429 and 5xx; returns the body once it
/// looks like JSON. Other 4xx responses fail fast.
///
/// `prepare` is called per attempt to attach auth and endpoint-specific
/// headers to a fresh request.
pub async fn fetch_json<F>(client: &Client, url: &str, prepare: F) -> Result<String>
where
    F: Fn(RequestBuilder) -> RequestBuilder,
{
    let backoff = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
        .factor(config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
        .take(config::RETRY_MAX_ATTEMPTS);

    let prepare = &prepare;

    RetryIf::spawn(
        backoff,
        move || async move {
            let res = prepare(client.get(url))
                .send()
                .await
                .context("Request send failed")
                .map_err(AttemptError::Retryable)?;

            let status = res.status();
            debug!(url, status = status.as_u16(), "upstream response");

            if status.is_success() {
                let text = res
                    .text()
                    .await
                    .context("Failed to read body")
                    .map_err(AttemptError::Retryable)?;

                let trimmed = text.trim();
                if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                    let preview: String = text.chars().take(200).collect();
                    return Err(AttemptError::Fatal(anyhow!("Non-JSON response: {}", preview)));
                }

                Ok(text)
            } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!(url, status = status.as_u16(), "retryable upstream error");
                Err(AttemptError::Retryable(anyhow!("Retryable error: {}", status)))
            } else {
                let body = res.text().await.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                Err(AttemptError::Fatal(anyhow!("Client error {}: {}", status, preview)))
            }
        },
        |e: &AttemptError| matches!(e, AttemptError::Retryable(_)),
    )
    .await
    .map_err(AttemptError::into_inner)
}
