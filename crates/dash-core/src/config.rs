//! Configuration for dashboard operations

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the dashboard engine and its provider clients
///
/// Constructed once at startup and passed down explicitly; there is no
/// ambient global configuration. Missing API keys disable the dependent
/// feature rather than failing construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Finnhub API key for fundamentals (optional)
    pub finnhub_api_key: Option<String>,

    /// NewsAPI key for news and sentiment (optional)
    pub newsapi_key: Option<String>,

    /// Cache TTL for price history
    pub cache_ttl_prices: Duration,

    /// Cache TTL for fundamental data
    pub cache_ttl_fundamental: Duration,

    /// Cache TTL for news data
    pub cache_ttl_news: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Finnhub requests per minute (free tier: 60)
    pub finnhub_rate_limit: u32,

    /// Number of articles fetched per news query
    pub max_news_articles: usize,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            newsapi_key: None,
            cache_ttl_prices: Duration::from_secs(300),       // 5 minutes
            cache_ttl_fundamental: Duration::from_secs(3600), // 1 hour
            cache_ttl_news: Duration::from_secs(300),         // 5 minutes
            request_timeout: Duration::from_secs(30),
            finnhub_rate_limit: 60,
            max_news_articles: 20,
        }
    }
}

impl DashConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashConfigBuilder {
        DashConfigBuilder::default()
    }

    /// Load API keys from the process environment
    ///
    /// Reads `FINNHUB_API_KEY` and `NEWSAPI_KEY`. An unset variable leaves
    /// the corresponding feature disabled; it is never an error.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            if !key.is_empty() {
                config.finnhub_api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("NEWSAPI_KEY") {
            if !key.is_empty() {
                config.newsapi_key = Some(key);
            }
        }
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.finnhub_rate_limit == 0 {
            return Err(DashError::ConfigError(
                "finnhub_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_news_articles == 0 {
            return Err(DashError::ConfigError(
                "max_news_articles must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DashConfig
#[derive(Debug, Default)]
pub struct DashConfigBuilder {
    finnhub_api_key: Option<String>,
    newsapi_key: Option<String>,
    cache_ttl_prices: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    cache_ttl_news: Option<Duration>,
    request_timeout: Option<Duration>,
    finnhub_rate_limit: Option<u32>,
    max_news_articles: Option<usize>,
}

impl DashConfigBuilder {
    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the NewsAPI key
    pub fn newsapi_key(mut self, key: impl Into<String>) -> Self {
        self.newsapi_key = Some(key.into());
        self
    }

    /// Set cache TTL for price history
    pub fn cache_ttl_prices(mut self, duration: Duration) -> Self {
        self.cache_ttl_prices = Some(duration);
        self
    }

    /// Set cache TTL for fundamental data
    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    /// Set cache TTL for news data
    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set Finnhub requests per minute
    pub fn finnhub_rate_limit(mut self, limit: u32) -> Self {
        self.finnhub_rate_limit = Some(limit);
        self
    }

    /// Set the number of articles fetched per news query
    pub fn max_news_articles(mut self, max: usize) -> Self {
        self.max_news_articles = Some(max);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashConfig> {
        let defaults = DashConfig::default();

        let config = DashConfig {
            finnhub_api_key: self.finnhub_api_key,
            newsapi_key: self.newsapi_key,
            cache_ttl_prices: self.cache_ttl_prices.unwrap_or(defaults.cache_ttl_prices),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            finnhub_rate_limit: self
                .finnhub_rate_limit
                .unwrap_or(defaults.finnhub_rate_limit),
            max_news_articles: self
                .max_news_articles
                .unwrap_or(defaults.max_news_articles),
        };

        config.validate()?;
        Ok(config)
    }
}
