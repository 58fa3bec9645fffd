//! NewsAPI client for recent articles mentioning a ticker

use crate::error::{DashError, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://newsapi.org/v2";

/// Article source metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: String,
}

/// One news article
///
/// Every field is individually defaulted: a record with a missing title or
/// timestamp still deserializes, it never fails the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: ArticleSource,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

/// NewsAPI client for the `everything` endpoint
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    /// Create a new NewsAPI client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the base URL (used by tests against a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch recent English articles mentioning the query, most relevant
    /// first, over the trailing `window_days` (no window when `None`),
    /// capped at `limit` articles.
    pub async fn everything(
        &self,
        query: &str,
        window_days: Option<i64>,
        limit: usize,
    ) -> Result<Vec<NewsArticle>> {
        let mut request = self
            .client
            .get(format!("{}/everything", self.base_url))
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("page", "1"),
                ("apiKey", self.api_key.as_str()),
            ]);

        if let Some(days) = window_days {
            let to = Utc::now();
            let from = to - Duration::days(days);
            request = request.query(&[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DashError::ApiError(format!("NewsAPI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::ApiError(format!(
                "NewsAPI error {status}: {body}"
            )));
        }

        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| DashError::ApiError(format!("Failed to parse NewsAPI response: {e}")))?;

        if body.status != "ok" {
            return Err(DashError::ApiError(format!(
                "NewsAPI error: {}",
                body.message.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        Ok(body.articles.into_iter().take(limit).collect())
    }
}
