//! Error types for dashboard operations

use thiserror::Error;

/// Dashboard specific errors
///
/// Nothing here is fatal to a page render: the engine catches each variant
/// at the section boundary and turns it into a user-visible message.
#[derive(Debug, Error)]
pub enum DashError {
    /// Provider API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// No data exists for the requested symbol
    #[error("No data found for ticker {symbol}. Are you sure this is the ticker symbol?")]
    TickerNotFound { symbol: String },

    /// Data exists but is unusable for the requested operation
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Too few observations to fit the forecast model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// A provider feature is disabled because its API key is missing
    #[error("{feature} is unavailable: {reason}")]
    FeatureUnavailable { feature: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Message shown to the user when this error degrades a page section.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
