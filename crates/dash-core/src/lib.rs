//! Core library for the tickerdash stock dashboard
//!
//! This crate provides everything the dashboard pages consume as plain data:
//!
//! - Historical price bars from Yahoo Finance
//! - Fundamental metrics from Finnhub
//! - Recent news from NewsAPI
//! - Lexicon-based news sentiment scoring
//! - Technical indicators (SMA, EMA, RSI, MACD, Bollinger Bands)
//! - An additive trend + seasonality price forecast
//!
//! # Architecture
//!
//! The [`engine::Dashboard`] type orchestrates one page interaction at a
//! time: it resolves the user's request (ticker, date range, horizon), runs
//! the relevant loaders and computations sequentially, and assembles a page
//! view model in which every section either carries its data or a
//! user-visible message explaining why it is unavailable. Provider failures
//! degrade a single section, never the whole page.
//!
//! Nothing is persisted; the only state shared between requests is a
//! TTL-bounded cache of provider responses.

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod sentiment;

// Re-export main types for convenience
pub use api::{FinnhubClient, NewsApiClient, NewsArticle, PriceBar, YahooFinanceClient};
pub use cache::{CacheManager, DashCache, NewsQueryKey, PriceRangeKey};
pub use config::DashConfig;
pub use engine::{Dashboard, DashboardRequest, Section};
pub use error::{DashError, Result};
pub use forecast::{ForecastPoint, ForecastResult};
pub use indicators::IndicatorSet;
pub use sentiment::{SentimentLabel, SentimentReport};
