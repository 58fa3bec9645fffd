//! Yahoo Finance price-history client

use crate::error::{DashError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

/// One daily OHLC price bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Fetch daily OHLC bars for a symbol over [start, end]
    ///
    /// Returns bars sorted ascending by date with duplicate dates removed.
    /// An empty response is reported as [`DashError::TickerNotFound`] so the
    /// caller can show a "no data found" message instead of failing.
    pub async fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| DashError::YahooFinance(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DashError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DashError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| DashError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashError::YahooFinance(e.to_string()))?;

        let bars = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        finalize_bars(symbol, bars)
    }
}

/// Normalize raw bars into the series the dashboard expects: sorted
/// ascending by date, one bar per date, and non-empty. An empty series
/// means the symbol has no data in the window and is reported as
/// [`DashError::TickerNotFound`].
fn finalize_bars(symbol: &str, mut bars: Vec<PriceBar>) -> Result<Vec<PriceBar>> {
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    if bars.is_empty() {
        return Err(DashError::TickerNotFound {
            symbol: symbol.to_string(),
        });
    }

    Ok(bars)
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooFinanceClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(date: NaiveDate, close: f64) -> PriceBar {
        PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_series_is_ticker_not_found() {
        let result = finalize_bars("NOPE", Vec::new());
        assert!(matches!(
            result,
            Err(DashError::TickerNotFound { ref symbol }) if symbol == "NOPE"
        ));
    }

    #[test]
    fn test_bars_are_sorted_ascending_by_date() {
        let bars = vec![
            bar(date(2024, 1, 5), 103.0),
            bar(date(2024, 1, 2), 100.0),
            bar(date(2024, 1, 3), 101.0),
        ];
        let bars = finalize_bars("AAPL", bars).unwrap();
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(bars[0].close, 100.0);
        assert_eq!(bars[2].close, 103.0);
    }

    #[test]
    fn test_duplicate_dates_keep_one_bar() {
        let bars = vec![
            bar(date(2024, 1, 2), 100.0),
            bar(date(2024, 1, 2), 100.5),
            bar(date(2024, 1, 3), 101.0),
        ];
        let bars = finalize_bars("AAPL", bars).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 2));
        assert_eq!(bars[1].date, date(2024, 1, 3));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_price_history() {
        let client = YahooFinanceClient::new();
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

        let bars = client.price_history("AAPL", start, end).await.unwrap();
        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
        assert!(bars.iter().all(|b| b.close > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_ticker_is_not_found() {
        let client = YahooFinanceClient::new();
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

        let result = client
            .price_history("DEFINITELY_NOT_A_TICKER_123", start, end)
            .await;
        assert!(matches!(
            result,
            Err(DashError::TickerNotFound { .. }) | Err(DashError::YahooFinance(_))
        ));
    }
}
