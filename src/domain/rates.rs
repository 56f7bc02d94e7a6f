//! Exchange-rate set consumed by the metrics engine.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Current market prices.
///
/// BTC prices come from the rate provider. The token (GMT) price in USD is
/// entered by hand; its EUR price is always derived through the USD→EUR cross
/// rate, never fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    pub btc_usd: Decimal,
    pub btc_eur: Decimal,
    pub usd_eur: Decimal,
    pub eur_usd: Decimal,
    pub gmt_usd: Decimal,
    pub gmt_eur: Decimal,
}

impl RateSet {
    /// Record freshly fetched BTC prices.
    ///
    /// The cross rates only move when both prices are known; otherwise the
    /// previous cross rates are kept.
    pub fn apply_market(&mut self, btc_usd: Decimal, btc_eur: Decimal) {
        self.btc_usd = btc_usd;
        self.btc_eur = btc_eur;
        if btc_usd.is_positive() && btc_eur.is_positive() {
            self.usd_eur = btc_eur.div_or_zero(btc_usd);
            self.eur_usd = Decimal::one().div_or_zero(self.usd_eur);
        }
        self.derive_token_eur();
    }

    /// Set the token price in USD (zero means unset).
    pub fn set_token_usd(&mut self, gmt_usd: Decimal) {
        self.gmt_usd = gmt_usd;
        self.derive_token_eur();
    }

    /// BTC priced in EUR through the USD cross rate.
    pub fn btc_eur_cross(&self) -> Decimal {
        self.btc_usd * self.usd_eur
    }

    fn derive_token_eur(&mut self) {
        self.gmt_eur = self.gmt_usd * self.usd_eur;
    }
}
