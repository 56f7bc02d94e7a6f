//! CoinGecko simple-price client.

use super::{MarketQuote, RateError, RateProvider};
use crate::domain::Decimal;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// BTC price feed backed by CoinGecko's public `simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoRateProvider {
    client: Client,
    base_url: String,
    max_elapsed: Duration,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<CoinPrices>,
}

#[derive(Debug, Default, Deserialize)]
struct CoinPrices {
    usd: Option<Decimal>,
    eur: Option<Decimal>,
}

impl CoinGeckoRateProvider {
    /// Create a client against `base_url` (e.g. `https://api.coingecko.com`).
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_elapsed: Duration::from_secs(30),
        }
    }

    /// Bound the total time spent retrying one fetch.
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    fn price_url(&self) -> String {
        format!(
            "{}/api/v3/simple/price?ids=bitcoin&vs_currencies=usd,eur",
            self.base_url
        )
    }
}

#[async_trait]
impl RateProvider for CoinGeckoRateProvider {
    async fn fetch_btc_quote(&self) -> Result<MarketQuote, RateError> {
        let url = self.price_url();
        debug!(url = %url, "Fetching BTC quote");

        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        };

        let body = retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(RateError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(RateError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(RateError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(RateError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(RateError::NetworkError(e.to_string())))
        })
        .await?;

        parse_simple_price(&body)
    }
}

/// Extract the BTC quote from a `simple/price` body; absent currencies read as 0.
fn parse_simple_price(body: &str) -> Result<MarketQuote, RateError> {
    let parsed: SimplePriceResponse =
        serde_json::from_str(body).map_err(|e| RateError::ParseError(e.to_string()))?;
    let prices = parsed.bitcoin.unwrap_or_default();

    Ok(MarketQuote {
        btc_usd: prices.usd.unwrap_or_default(),
        btc_eur: prices.eur.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_parse_simple_price() {
        let quote = parse_simple_price(r#"{"bitcoin":{"usd":60000,"eur":55000.5}}"#).unwrap();
        assert_eq!(quote.btc_usd, d("60000"));
        assert_eq!(quote.btc_eur, d("55000.5"));
    }

    #[test]
    fn test_parse_missing_currency_reads_zero() {
        let quote = parse_simple_price(r#"{"bitcoin":{"usd":60000}}"#).unwrap();
        assert_eq!(quote.btc_eur, Decimal::zero());

        let quote = parse_simple_price(r#"{}"#).unwrap();
        assert_eq!(quote, MarketQuote::default());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_simple_price("<html>"),
            Err(RateError::ParseError(_))
        ));
    }

    #[test]
    fn test_price_url_strips_trailing_slash() {
        let provider = CoinGeckoRateProvider::new("http://localhost:9999/".to_string());
        assert_eq!(
            provider.price_url(),
            "http://localhost:9999/api/v3/simple/price?ids=bitcoin&vs_currencies=usd,eur"
        );
    }
}
