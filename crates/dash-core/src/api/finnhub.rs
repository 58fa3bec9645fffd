//! Finnhub client for fundamental financial metrics

use crate::error::{DashError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://finnhub.io/api/v1";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Raw `stock/metric` response body
#[derive(Debug, Deserialize)]
struct BasicFinancialsResponse {
    #[serde(default)]
    metric: BTreeMap<String, serde_json::Value>,
}

/// Finnhub client for the basic-financials endpoint
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            rate_limiter,
        }
    }

    /// Override the base URL (used by tests against a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the full basic-financials metric map for a symbol
    ///
    /// Values are kept as raw JSON so that a single non-numeric or missing
    /// metric never rejects the batch; the caller stringifies per field.
    /// An empty map is a valid response ("no data available").
    pub async fn basic_financials(
        &self,
        symbol: &str,
    ) -> Result<BTreeMap<String, serde_json::Value>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(format!("{}/stock/metric", self.base_url))
            .query(&[
                ("symbol", symbol),
                ("metric", "all"),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DashError::ApiError(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::ApiError(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        let body: BasicFinancialsResponse = response
            .json()
            .await
            .map_err(|e| DashError::ApiError(format!("Failed to parse Finnhub response: {e}")))?;

        Ok(body.metric)
    }
}
