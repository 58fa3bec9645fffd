//! Page view models
//!
//! Every page is a bundle of sections, and each section either carries its
//! data or the user-visible message explaining why it is unavailable. A
//! failed provider call degrades one section; the page always renders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::{NewsArticle, PriceBar};
use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::indicators::IndicatorSet;
use crate::sentiment::SentimentReport;

/// One renderable page section
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum Section<T> {
    /// Section data is ready to render
    Ready(T),
    /// Section could not be produced; render this message instead
    Unavailable(String),
}

impl<T> Section<T> {
    /// Collapse a loader result into a section, logging the failure
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => {
                tracing::warn!("Section degraded: {err}");
                Self::Unavailable(err.user_message())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The contained data, if ready
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}

/// Fundamentals snapshot rendered as a two-column table
#[derive(Debug, Clone, Serialize)]
pub struct FundamentalsTable {
    /// (metric name, stringified value) rows, sorted by name
    pub rows: Vec<(String, String)>,
}

impl FundamentalsTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Home page: historical candles, forecast, fundamentals, recent news
#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_years: u32,
    pub prices: Section<Vec<PriceBar>>,
    pub forecast: Section<ForecastResult>,
    pub fundamentals: Section<FundamentalsTable>,
    pub news: Section<Vec<NewsArticle>>,
}

/// News sentiment page
#[derive(Debug, Clone, Serialize)]
pub struct SentimentPage {
    pub ticker: String,
    pub report: Section<SentimentReport>,
}

/// Technical analysis page: candles plus indicator overlays
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalPage {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub prices: Section<Vec<PriceBar>>,
    pub indicators: Section<IndicatorSet>,
}
