//! Satoshi-to-fiat conversion record.

use crate::domain::gain::whole_sats;
use crate::domain::{Decimal, LedgerDate};
use serde::{Deserialize, Serialize};

/// A sale of satoshis for fiat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub date: LedgerDate,
    #[serde(deserialize_with = "whole_sats")]
    pub sats: i64,
    /// Fiat amount received.
    pub montant: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInput {
    pub date: LedgerDate,
    #[serde(deserialize_with = "whole_sats")]
    pub sats: i64,
    pub montant: Decimal,
}

impl Sale {
    pub fn from_input(id: i64, input: SaleInput) -> Self {
        Sale {
            id,
            date: input.date,
            sats: input.sats,
            montant: input.montant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_accepts_fractional_sats() {
        let sale: Sale = serde_json::from_str(
            r#"{"id": 4, "date": "2024-05-02", "sats": 99999.5, "montant": 55.1}"#,
        )
        .unwrap();
        assert_eq!(sale.sats, 100000);
        assert_eq!(sale.montant.to_canonical_string(), "55.1");
    }
}
