//! Exchange-rate sources and the process-wide rate book.

use crate::domain::Decimal;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod book;
pub mod coingecko;
pub mod mock;

pub use book::{spawn_refresher, RateBook, RateSnapshot};
pub use coingecko::CoinGeckoRateProvider;
pub use mock::MockRateProvider;

/// Current BTC market prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketQuote {
    pub btc_usd: Decimal,
    pub btc_eur: Decimal,
}

/// Source of BTC market prices.
///
/// Only BTC is fetched; the token price is always entered by hand.
#[async_trait]
pub trait RateProvider: Send + Sync + fmt::Debug {
    /// Fetch the current BTC price in USD and EUR.
    ///
    /// A currency missing from the upstream answer is reported as 0.
    async fn fetch_btc_quote(&self) -> Result<MarketQuote, RateError>;
}

/// Error type for rate provider operations.
#[derive(Debug, Clone, Error)]
pub enum RateError {
    /// Network error (e.g., connection timeout, DNS failure)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error (e.g., 5xx server error)
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Rate limit exceeded
    #[error("Rate limited")]
    RateLimited,
}
