//! Cost basis, realized returns, maintenance and sales rollups.

use crate::domain::{sats_to_fiat, Decimal, Gain, Investment, InvestmentCategory, Miner, RateSet, Sale};
use crate::engine::fleet::miner_total_cost;
use serde::Serialize;

/// Everything invested: each miner's total cost plus token purchases.
pub fn total_investment(miners: &[Miner], investments: &[Investment]) -> Decimal {
    let fleet: Decimal = miners
        .iter()
        .map(|m| miner_total_cost(m, investments))
        .sum();
    let tokens: Decimal = investments
        .iter()
        .filter(|i| i.cat == InvestmentCategory::TokenPurchase)
        .map(|i| i.cost)
        .sum();
    fleet + tokens
}

/// Satoshis harvested so far, valued at today's BTC/EUR rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Realized {
    pub sats: i64,
    pub value: Decimal,
}

pub fn realized_gains(gains: &[Gain], rates: &RateSet) -> Realized {
    let sats = gains.iter().map(|g| g.sats).fold(0, i64::saturating_add);
    Realized {
        sats,
        value: sats_to_fiat(sats, rates.btc_eur),
    }
}

/// Realized value as a percentage of the total investment; 0 with nothing invested.
pub fn roi_pct(realized_value: Decimal, total_investment: Decimal) -> Decimal {
    realized_value.div_or_zero(total_investment) * Decimal::hundred()
}

/// Maintenance fees paid across all harvests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub tokens: Decimal,
    pub fiat: Decimal,
}

pub fn maintenance(gains: &[Gain], rates: &RateSet) -> Maintenance {
    let tokens: Decimal = gains.iter().map(Gain::maintenance_tokens).sum();
    Maintenance {
        tokens,
        fiat: tokens * rates.gmt_eur,
    }
}

/// Satoshis sold and fiat received. The two totals are not reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub sats: i64,
    pub fiat: Decimal,
}

pub fn sales_totals(sales: &[Sale]) -> SalesTotals {
    SalesTotals {
        sats: sales.iter().map(|s| s.sats).fold(0, i64::saturating_add),
        fiat: sales.iter().map(|s| s.montant).sum(),
    }
}
