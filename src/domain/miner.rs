//! Mining hardware record.

use crate::domain::{Decimal, InvestmentCategory, LedgerDate};
use serde::{Deserialize, Serialize};

/// A unit of mining hardware.
///
/// `power` is hash-rate capacity, `eff` is consumption per power unit (lower is
/// better) and `cost` is the base acquisition cost, excluding later upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Miner {
    pub id: i64,
    pub power: Decimal,
    pub eff: Decimal,
    pub cost: Decimal,
    pub date: LedgerDate,
}

/// Operator input for a new miner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMiner {
    pub power: Decimal,
    pub eff: Decimal,
    pub cost: Decimal,
    pub date: LedgerDate,
}

impl Miner {
    /// Lowest efficiency an efficiency upgrade can bring a miner down to.
    pub fn efficiency_floor() -> Decimal {
        Decimal::one()
    }

    /// Apply the effect of an upgrade investment of `qty` units.
    ///
    /// Capacity adds power; efficiency lowers `eff`, clamped at the floor.
    /// Other categories leave the miner untouched.
    pub fn apply_investment(&mut self, category: InvestmentCategory, qty: Decimal) {
        match category {
            InvestmentCategory::Capacity => self.power += qty,
            InvestmentCategory::Efficiency => {
                self.eff = std::cmp::max(Self::efficiency_floor(), self.eff - qty);
            }
            InvestmentCategory::Creation | InvestmentCategory::TokenPurchase => {}
        }
    }

    /// Undo a previously applied upgrade investment.
    ///
    /// The efficiency floor is not tracked, so reverting an upgrade that was
    /// clamped adds back the full `qty`.
    pub fn revert_investment(&mut self, category: InvestmentCategory, qty: Decimal) {
        match category {
            InvestmentCategory::Capacity => self.power -= qty,
            InvestmentCategory::Efficiency => self.eff += qty,
            InvestmentCategory::Creation | InvestmentCategory::TokenPurchase => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn miner(power: &str, eff: &str) -> Miner {
        Miner {
            id: 1,
            power: d(power),
            eff: d(eff),
            cost: d("1000"),
            date: LedgerDate::from_ymd(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_capacity_upgrade_adds_power() {
        let mut m = miner("100", "20");
        m.apply_investment(InvestmentCategory::Capacity, d("10"));
        assert_eq!(m.power, d("110"));
        assert_eq!(m.eff, d("20"));
    }

    #[test]
    fn test_efficiency_upgrade_is_floored_at_one() {
        let mut m = miner("100", "20");
        m.apply_investment(InvestmentCategory::Efficiency, d("5"));
        assert_eq!(m.eff, d("15"));

        m.apply_investment(InvestmentCategory::Efficiency, d("40"));
        assert_eq!(m.eff, d("1"));
    }

    #[test]
    fn test_revert_undoes_apply() {
        let mut m = miner("100", "20");
        m.apply_investment(InvestmentCategory::Capacity, d("10"));
        m.revert_investment(InvestmentCategory::Capacity, d("10"));
        m.apply_investment(InvestmentCategory::Efficiency, d("3"));
        m.revert_investment(InvestmentCategory::Efficiency, d("3"));
        assert_eq!(m, miner("100", "20"));
    }

    #[test]
    fn test_creation_and_token_categories_do_not_mutate() {
        let mut m = miner("100", "20");
        m.apply_investment(InvestmentCategory::Creation, d("100"));
        m.apply_investment(InvestmentCategory::TokenPurchase, d("50"));
        assert_eq!(m, miner("100", "20"));
    }
}
