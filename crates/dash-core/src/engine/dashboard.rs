//! One-ticker dashboard orchestration
//!
//! Control flow per page is linear: resolve the request, await each loader
//! in order, derive the computed series, assemble the page. The only state
//! shared across requests is the TTL cache tier behind each loader.

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::api::{FinnhubClient, NewsApiClient, NewsArticle, PriceBar, YahooFinanceClient};
use crate::cache::{CacheManager, NewsQueryKey, PriceRangeKey};
use crate::config::DashConfig;
use crate::error::{DashError, Result};
use crate::forecast;
use crate::indicators::IndicatorSet;
use crate::sentiment::SentimentReport;

use super::section::{
    FundamentalsTable, OverviewPage, Section, SentimentPage, TechnicalPage,
};

/// Days of history queried for the home-page news section
const NEWS_WINDOW_DAYS: i64 = 30;
/// Articles shown on the home page
const OVERVIEW_NEWS_LIMIT: usize = 5;

const EMPTY_TICKER_MESSAGE: &str = "Enter a valid ticker symbol to see the data.";

/// One user interaction: a ticker, a date window, and a forecast horizon
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_years: u32,
}

impl DashboardRequest {
    /// Normalize user input: trim and uppercase the ticker, clamp the
    /// horizon to the slider range (1-10 years)
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate, horizon_years: u32) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            start,
            end,
            horizon_years: horizon_years.clamp(1, 10),
        }
    }

    fn ticker_is_empty(&self) -> bool {
        self.ticker.is_empty()
    }
}

/// Dashboard engine holding configuration, caches, and provider clients
pub struct Dashboard {
    config: DashConfig,
    caches: CacheManager,
    yahoo: YahooFinanceClient,
    finnhub: Option<FinnhubClient>,
    newsapi: Option<NewsApiClient>,
}

impl Dashboard {
    /// Build the engine from a validated configuration
    ///
    /// Clients whose API key is absent are simply not constructed; the
    /// corresponding sections report themselves unavailable.
    pub fn new(config: DashConfig) -> Result<Self> {
        config.validate()?;

        let finnhub = config
            .finnhub_api_key
            .as_ref()
            .map(|key| FinnhubClient::new(key.clone(), config.finnhub_rate_limit));
        let newsapi = config.newsapi_key.as_ref().map(|key| NewsApiClient::new(key.clone()));

        Ok(Self {
            caches: CacheManager::from_config(&config),
            yahoo: YahooFinanceClient::new(),
            finnhub,
            newsapi,
            config,
        })
    }

    /// Assemble the home page: candles, forecast, fundamentals, news
    pub async fn overview(&self, request: &DashboardRequest) -> OverviewPage {
        if request.ticker_is_empty() {
            return OverviewPage {
                ticker: String::new(),
                start: request.start,
                end: request.end,
                horizon_years: request.horizon_years,
                prices: Section::Unavailable(EMPTY_TICKER_MESSAGE.to_string()),
                forecast: Section::Unavailable(EMPTY_TICKER_MESSAGE.to_string()),
                fundamentals: Section::Unavailable(EMPTY_TICKER_MESSAGE.to_string()),
                news: Section::Unavailable(EMPTY_TICKER_MESSAGE.to_string()),
            };
        }

        info!(ticker = %request.ticker, "Building overview page");

        let prices = Section::from_result(
            self.load_prices(&request.ticker, request.start, request.end)
                .await,
        );

        let forecast = match prices.value() {
            Some(bars) => Section::from_result(forecast_closes(bars, request.horizon_years)),
            None => Section::Unavailable(
                "Price history unavailable; nothing to forecast.".to_string(),
            ),
        };

        let fundamentals = Section::from_result(self.fundamentals(&request.ticker).await);
        let news = Section::from_result(
            self.news(&request.ticker, Some(NEWS_WINDOW_DAYS), OVERVIEW_NEWS_LIMIT)
                .await,
        );

        OverviewPage {
            ticker: request.ticker.clone(),
            start: request.start,
            end: request.end,
            horizon_years: request.horizon_years,
            prices,
            forecast,
            fundamentals,
            news,
        }
    }

    /// Assemble the news-sentiment page
    pub async fn sentiment(&self, ticker: &str) -> SentimentPage {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return SentimentPage {
                ticker,
                report: Section::Unavailable("Please enter a ticker".to_string()),
            };
        }

        info!(ticker = %ticker, "Building sentiment page");

        let report = match self
            .news(&ticker, None, self.config.max_news_articles)
            .await
        {
            Ok(articles) if articles.is_empty() => {
                Section::Unavailable("No news found for the ticker".to_string())
            }
            Ok(articles) => Section::Ready(SentimentReport::analyze(&articles)),
            Err(err) => Section::Unavailable(err.user_message()),
        };

        SentimentPage { ticker, report }
    }

    /// Assemble the technical-analysis page
    pub async fn technical(&self, request: &DashboardRequest) -> TechnicalPage {
        if request.ticker_is_empty() {
            return TechnicalPage {
                ticker: String::new(),
                start: request.start,
                end: request.end,
                prices: Section::Unavailable("Please enter a ticker symbol.".to_string()),
                indicators: Section::Unavailable("Please enter a ticker symbol.".to_string()),
            };
        }

        info!(ticker = %request.ticker, "Building technical page");

        let prices = Section::from_result(
            self.load_prices(&request.ticker, request.start, request.end)
                .await,
        );

        let indicators = match prices.value() {
            Some(bars) => {
                let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
                Section::Ready(IndicatorSet::compute(&closes))
            }
            None => Section::Unavailable(
                "No data found for the given ticker symbol.".to_string(),
            ),
        };

        TechnicalPage {
            ticker: request.ticker.clone(),
            start: request.start,
            end: request.end,
            prices,
            indicators,
        }
    }

    /// Load price bars, memoized per (ticker, start, end) for the session
    async fn load_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let key = PriceRangeKey {
            symbol: symbol.to_string(),
            start,
            end,
        };

        self.caches
            .prices
            .get_or_fetch(key, || async {
                let start_dt = start.and_time(NaiveTime::MIN).and_utc();
                let end_dt = end.and_time(NaiveTime::MIN).and_utc();
                self.yahoo.price_history(symbol, start_dt, end_dt).await
            })
            .await
    }

    /// Fetch the fundamentals snapshot as table rows
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsTable> {
        let Some(client) = self.finnhub.as_ref() else {
            return Err(DashError::FeatureUnavailable {
                feature: "Fundamentals".to_string(),
                reason: "FINNHUB_API_KEY is not set".to_string(),
            });
        };

        let metrics = self
            .caches
            .fundamental
            .get_or_fetch(symbol.to_string(), || async {
                client.basic_financials(symbol).await
            })
            .await?;

        let rows = metrics
            .into_iter()
            .map(|(name, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => "-".to_string(),
                    other => other.to_string(),
                };
                (name, rendered)
            })
            .collect();

        Ok(FundamentalsTable { rows })
    }

    /// Fetch recent news articles, cached per query shape
    async fn news(
        &self,
        symbol: &str,
        window_days: Option<i64>,
        limit: usize,
    ) -> Result<Vec<NewsArticle>> {
        let Some(client) = self.newsapi.as_ref() else {
            return Err(DashError::FeatureUnavailable {
                feature: "News".to_string(),
                reason: "NEWSAPI_KEY is not set".to_string(),
            });
        };

        let key = NewsQueryKey {
            symbol: symbol.to_string(),
            window_days,
            limit,
        };

        self.caches
            .news
            .get_or_fetch(key, || async {
                client.everything(symbol, window_days, limit).await
            })
            .await
    }
}

/// Re-key bars to (date, close) and fit the forecast
fn forecast_closes(bars: &[PriceBar], horizon_years: u32) -> Result<forecast::ForecastResult> {
    let observations: Vec<(NaiveDate, f64)> = bars.iter().map(|b| (b.date, b.close)).collect();
    forecast::forecast(&observations, horizon_years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ticker: &str) -> DashboardRequest {
        DashboardRequest::new(
            ticker,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            1,
        )
    }

    #[test]
    fn test_request_normalization() {
        let req = DashboardRequest::new(
            "  aapl ",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            25,
        );
        assert_eq!(req.ticker, "AAPL");
        assert_eq!(req.horizon_years, 10);

        let req = request("dow");
        assert_eq!(req.ticker, "DOW");
        assert_eq!(req.horizon_years, 1);
    }

    #[tokio::test]
    async fn test_missing_keys_degrade_features() {
        let dashboard = Dashboard::new(DashConfig::default()).unwrap();

        let result = dashboard.fundamentals("AAPL").await;
        assert!(matches!(
            result,
            Err(DashError::FeatureUnavailable { ref feature, .. }) if feature == "Fundamentals"
        ));

        let result = dashboard.news("AAPL", Some(30), 5).await;
        assert!(matches!(
            result,
            Err(DashError::FeatureUnavailable { ref feature, .. }) if feature == "News"
        ));
    }

    #[tokio::test]
    async fn test_empty_ticker_renders_prompts_without_fetching() {
        let dashboard = Dashboard::new(DashConfig::default()).unwrap();

        let page = dashboard.overview(&request("   ")).await;
        assert!(!page.prices.is_ready());
        assert!(!page.forecast.is_ready());
        assert!(!page.fundamentals.is_ready());
        assert!(!page.news.is_ready());

        let page = dashboard.sentiment("").await;
        assert!(!page.report.is_ready());

        let page = dashboard.technical(&request("")).await;
        assert!(!page.prices.is_ready());
        assert!(!page.indicators.is_ready());
    }

    #[test]
    fn test_forecast_closes_requires_two_bars() {
        let bars = vec![PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 0,
        }];
        assert!(matches!(
            forecast_closes(&bars, 1),
            Err(DashError::InsufficientData(_))
        ));
    }
}
