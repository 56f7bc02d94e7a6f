//! Mock rate provider for testing without network calls.

use super::{MarketQuote, RateError, RateProvider};
use crate::domain::Decimal;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rate provider returning a fixed quote, or a fixed error.
#[derive(Debug, Default)]
pub struct MockRateProvider {
    quote: MarketQuote,
    failure: Option<RateError>,
    calls: AtomicUsize,
}

impl MockRateProvider {
    /// Create a mock returning a zero quote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quote returned by `fetch_btc_quote`.
    pub fn with_quote(mut self, btc_usd: Decimal, btc_eur: Decimal) -> Self {
        self.quote = MarketQuote { btc_usd, btc_eur };
        self
    }

    /// Make every fetch fail with `error`.
    pub fn failing(error: RateError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    async fn fetch_btc_quote(&self) -> Result<MarketQuote, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.quote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_quote() {
        let mock = MockRateProvider::new().with_quote(Decimal::from(60000), Decimal::from(55000));
        let quote = tokio_test::block_on(mock.fetch_btc_quote()).unwrap();
        assert_eq!(quote.btc_usd, Decimal::from(60000));
        assert_eq!(quote.btc_eur, Decimal::from(55000));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let mock = MockRateProvider::failing(RateError::RateLimited);
        assert!(matches!(
            mock.fetch_btc_quote().await,
            Err(RateError::RateLimited)
        ));
        assert_eq!(mock.calls(), 1);
    }
}
