//! The full ledger as four collections.

use crate::domain::{Gain, Investment, Miner, Sale};
use serde::{Deserialize, Serialize};

/// Every row of the four ledger collections.
///
/// Serialized with the collection names of the export format: `miners`,
/// `investissements`, `gains`, `ventes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRows {
    pub miners: Vec<Miner>,
    #[serde(rename = "investissements")]
    pub investments: Vec<Investment>,
    pub gains: Vec<Gain>,
    #[serde(rename = "ventes")]
    pub sales: Vec<Sale>,
}

impl LedgerRows {
    /// Wire names of the four collections, in reinsertion order.
    pub const COLLECTIONS: [&'static str; 4] = ["miners", "investissements", "gains", "ventes"];

    pub fn is_empty(&self) -> bool {
        self.miners.is_empty()
            && self.investments.is_empty()
            && self.gains.is_empty()
            && self.sales.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.miners.len() + self.investments.len() + self.gains.len() + self.sales.len()
    }
}
