//! API clients for the three external data providers

pub mod finnhub;
pub mod newsapi;
pub mod yahoo;

pub use finnhub::FinnhubClient;
pub use newsapi::{NewsApiClient, NewsArticle};
pub use yahoo::{PriceBar, YahooFinanceClient};
