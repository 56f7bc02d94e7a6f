//! Capital investment record.

use crate::domain::{Decimal, LedgerDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What an investment paid for.
///
/// Wire names match the export format: `CREATION`, `TH`, `W/TH`, `GMT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentCategory {
    /// Initial acquisition of a miner, paired 1:1 with it.
    #[serde(rename = "CREATION")]
    Creation,
    /// Adds power to an existing miner.
    #[serde(rename = "TH")]
    Capacity,
    /// Lowers the consumption per power unit of an existing miner.
    #[serde(rename = "W/TH")]
    Efficiency,
    /// Purchase of maintenance tokens, unrelated to any miner.
    #[serde(rename = "GMT")]
    TokenPurchase,
}

impl InvestmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentCategory::Creation => "CREATION",
            InvestmentCategory::Capacity => "TH",
            InvestmentCategory::Efficiency => "W/TH",
            InvestmentCategory::TokenPurchase => "GMT",
        }
    }

    /// Capacity and efficiency investments upgrade a miner and count as its
    /// extra cost.
    pub fn is_upgrade(&self) -> bool {
        matches!(
            self,
            InvestmentCategory::Capacity | InvestmentCategory::Efficiency
        )
    }
}

impl fmt::Display for InvestmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown investment category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for InvestmentCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATION" => Ok(InvestmentCategory::Creation),
            "TH" => Ok(InvestmentCategory::Capacity),
            "W/TH" => Ok(InvestmentCategory::Efficiency),
            "GMT" => Ok(InvestmentCategory::TokenPurchase),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}

/// A capital investment.
///
/// `miner_id` is `None` for token purchases; exported as `minerId: 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub date: LedgerDate,
    #[serde(rename = "minerId", default, with = "miner_ref")]
    pub miner_id: Option<i64>,
    pub cat: InvestmentCategory,
    pub qty: Decimal,
    pub cost: Decimal,
}

impl Investment {
    pub fn belongs_to(&self, miner_id: i64) -> bool {
        self.miner_id == Some(miner_id)
    }
}

/// `minerId` is written as 0 when absent and read back as absent when 0 or null.
mod miner_ref {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.filter(|id| *id != 0))
    }
}
