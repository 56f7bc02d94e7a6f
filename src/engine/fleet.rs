//! Power and cost aggregation over the miner fleet.

use crate::domain::{Decimal, Investment, LedgerDate, Miner};
use serde::Serialize;

/// Sum of every miner's power.
pub fn total_power(miners: &[Miner]) -> Decimal {
    miners.iter().map(|m| m.power).sum()
}

/// Power-weighted mean efficiency; 0 for an empty or powerless fleet.
pub fn weighted_avg_efficiency(miners: &[Miner]) -> Decimal {
    let weighted: Decimal = miners.iter().map(|m| m.power * m.eff).sum();
    weighted.div_or_zero(total_power(miners))
}

/// Cost of the upgrade investments attached to a miner.
pub fn miner_extra_cost(miner_id: i64, investments: &[Investment]) -> Decimal {
    investments
        .iter()
        .filter(|i| i.belongs_to(miner_id) && i.cat.is_upgrade())
        .map(|i| i.cost)
        .sum()
}

/// Base acquisition cost plus upgrades.
pub fn miner_total_cost(miner: &Miner, investments: &[Investment]) -> Decimal {
    miner.cost + miner_extra_cost(miner.id, investments)
}

/// Average acquisition cost of one power unit across the fleet.
///
/// Counts base costs of every miner plus every capacity/efficiency investment.
pub fn price_per_power_unit(miners: &[Miner], investments: &[Investment]) -> Decimal {
    let base: Decimal = miners.iter().map(|m| m.cost).sum();
    let upgrades: Decimal = investments
        .iter()
        .filter(|i| i.cat.is_upgrade())
        .map(|i| i.cost)
        .sum();
    (base + upgrades).div_or_zero(total_power(miners))
}

/// Display card for one miner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerCard {
    pub id: i64,
    pub power: Decimal,
    pub eff: Decimal,
    pub total_cost: Decimal,
    pub date: LedgerDate,
}

pub fn miner_cards(miners: &[Miner], investments: &[Investment]) -> Vec<MinerCard> {
    miners
        .iter()
        .map(|m| MinerCard {
            id: m.id,
            power: m.power,
            eff: m.eff,
            total_cost: miner_total_cost(m, investments),
            date: m.date,
        })
        .collect()
}
