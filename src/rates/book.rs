//! Process-wide rate book: market prices, manual token price, fee reduction.

use super::{RateError, RateProvider};
use crate::db::Repository;
use crate::domain::{Decimal, RateSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Settings key of the manually entered token price in USD.
pub const MANUAL_TOKEN_KEY: &str = "manual_gmt_usd";
/// Settings key of the fee-reduction fraction.
pub const REDUCTION_KEY: &str = "reduc";

/// Point-in-time copy of the rate book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub rates: RateSet,
    /// Manual token price, `None` when unset.
    pub manual_token_usd: Option<Decimal>,
    /// Fee reduction as a fraction in [0, 1].
    pub reduction: Decimal,
}

/// Holds the current rates and persists the two operator-entered settings.
///
/// Fetched BTC prices live only in memory; a failed refresh keeps the last
/// known values (all zero before the first success).
pub struct RateBook {
    repo: Arc<Repository>,
    state: RwLock<RateSnapshot>,
}

impl RateBook {
    /// Build the book from persisted settings.
    ///
    /// An unreadable manual price is treated as unset; an unreadable or
    /// out-of-range reduction falls back to `default_reduction`.
    pub async fn load(repo: Arc<Repository>, default_reduction: Decimal) -> Result<Self, sqlx::Error> {
        let manual_token_usd = repo
            .get_setting(MANUAL_TOKEN_KEY)
            .await?
            .as_deref()
            .and_then(Decimal::parse_lenient)
            .filter(Decimal::is_positive);

        let reduction = repo
            .get_setting(REDUCTION_KEY)
            .await?
            .as_deref()
            .and_then(Decimal::parse_lenient)
            .filter(|r| *r >= Decimal::zero() && *r <= Decimal::one())
            .unwrap_or(default_reduction);

        let mut rates = RateSet::default();
        if let Some(price) = manual_token_usd {
            rates.set_token_usd(price);
        }

        debug!(manual_token_usd = ?manual_token_usd, reduction = %reduction, "Rate book loaded");

        Ok(Self {
            repo,
            state: RwLock::new(RateSnapshot {
                rates,
                manual_token_usd,
                reduction,
            }),
        })
    }

    pub async fn snapshot(&self) -> RateSnapshot {
        *self.state.read().await
    }

    pub async fn rates(&self) -> RateSet {
        self.state.read().await.rates
    }

    /// Fetch BTC prices from `provider` and fold them into the rate set.
    ///
    /// On failure the previous rates stay in place and the error is returned
    /// after being logged.
    pub async fn refresh(&self, provider: &dyn RateProvider) -> Result<RateSet, RateError> {
        match provider.fetch_btc_quote().await {
            Ok(quote) => {
                let mut state = self.state.write().await;
                state.rates.apply_market(quote.btc_usd, quote.btc_eur);
                info!(btc_usd = %quote.btc_usd, btc_eur = %quote.btc_eur, "Rates refreshed");
                Ok(state.rates)
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, keeping last known rates");
                Err(e)
            }
        }
    }

    /// Set the manual token price from operator input.
    ///
    /// Input that is not a number, or is not positive, is ignored and the
    /// previous price kept. Returns whether the price changed.
    pub async fn set_manual_token_price(&self, raw: &str) -> Result<bool, sqlx::Error> {
        let Some(price) = Decimal::parse_lenient(raw).filter(Decimal::is_positive) else {
            debug!(input = %raw, "Ignoring invalid token price");
            return Ok(false);
        };

        let mut state = self.state.write().await;
        self.repo
            .set_setting(MANUAL_TOKEN_KEY, &price.to_canonical_string())
            .await?;
        state.manual_token_usd = Some(price);
        state.rates.set_token_usd(price);
        Ok(true)
    }

    /// Forget the manual token price; the token is then valued at 0.
    pub async fn clear_manual_token_price(&self) -> Result<(), sqlx::Error> {
        let mut state = self.state.write().await;
        self.repo.remove_setting(MANUAL_TOKEN_KEY).await?;
        state.manual_token_usd = None;
        state.rates.set_token_usd(Decimal::zero());
        Ok(())
    }

    /// Set the fee reduction from a percentage in [0, 100].
    ///
    /// Values outside that range are ignored. Returns whether it was applied.
    pub async fn set_reduction_percent(&self, percent: Decimal) -> Result<bool, sqlx::Error> {
        if percent < Decimal::zero() || percent > Decimal::hundred() {
            debug!(percent = %percent, "Ignoring out-of-range reduction");
            return Ok(false);
        }

        let fraction = percent.div_or_zero(Decimal::hundred());
        let mut state = self.state.write().await;
        self.repo
            .set_setting(REDUCTION_KEY, &fraction.to_canonical_string())
            .await?;
        state.reduction = fraction;
        Ok(true)
    }
}

/// Refresh rates once now, then every `interval` when one is given.
pub fn spawn_refresher(
    book: Arc<RateBook>,
    provider: Arc<dyn RateProvider>,
    interval: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = book.refresh(provider.as_ref()).await;

        let Some(period) = interval else {
            return;
        };
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately; the startup refresh covered it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let _ = book.refresh(provider.as_ref()).await;
        }
    })
}
