//! Harvest record.

use crate::domain::{Decimal, LedgerDate, RateSet};
use serde::{Deserialize, Deserializer, Serialize};

/// Satoshis in one bitcoin.
pub const SATS_PER_BTC: i64 = 100_000_000;

/// Fiat value of `sats` at `btc_fiat`.
pub fn sats_to_fiat(sats: i64, btc_fiat: Decimal) -> Decimal {
    Decimal::from(sats).div_or_zero(Decimal::from(SATS_PER_BTC)) * btc_fiat
}

/// Read a satoshi count that may arrive with a fractional part, rounding
/// half away from zero.
pub(crate) fn whole_sats<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Decimal::deserialize(deserializer)?;
    Ok(raw.round_half_up().to_i64_saturating())
}

/// A harvest: satoshis collected and the maintenance fees paid for them.
///
/// `valeur_eur` and `cout_entretien_eur` are priced when the row is written and
/// are not revalued when rates move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gain {
    pub id: i64,
    pub date: LedgerDate,
    #[serde(deserialize_with = "whole_sats")]
    pub sats: i64,
    /// Service fee, in tokens.
    #[serde(default)]
    pub service: Decimal,
    /// Electricity fee, in tokens.
    #[serde(default)]
    pub elec: Decimal,
    #[serde(default)]
    pub valeur_eur: Decimal,
    #[serde(default)]
    pub cout_entretien_eur: Decimal,
}

/// Operator input for a gain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainInput {
    pub date: LedgerDate,
    #[serde(deserialize_with = "whole_sats")]
    pub sats: i64,
    #[serde(default)]
    pub service: Decimal,
    #[serde(default)]
    pub elec: Decimal,
}

impl Gain {
    /// Build a gain row from operator input, pricing it at `rates`.
    pub fn priced(id: i64, input: GainInput, rates: &RateSet) -> Self {
        let valeur_eur = sats_to_fiat(input.sats, rates.btc_eur);
        let cout_entretien_eur = (input.service + input.elec) * rates.gmt_eur;
        Gain {
            id,
            date: input.date,
            sats: input.sats,
            service: input.service,
            elec: input.elec,
            valeur_eur,
            cout_entretien_eur,
        }
    }

    /// Service plus electricity, in tokens.
    pub fn maintenance_tokens(&self) -> Decimal {
        self.service + self.elec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_fractional_sats_round_to_whole() {
        let gain: GainInput =
            serde_json::from_str(r#"{"date": "2024-03-01", "sats": 2500.6}"#).unwrap();
        assert_eq!(gain.sats, 2501);
        let gain: GainInput =
            serde_json::from_str(r#"{"date": "2024-03-01", "sats": 2500.4}"#).unwrap();
        assert_eq!(gain.sats, 2500);
        let gain: GainInput =
            serde_json::from_str(r#"{"date": "2024-03-01", "sats": 1200}"#).unwrap();
        assert_eq!(gain.sats, 1200);
    }

    #[test]
    fn test_priced_gain_snapshots_fiat_values() {
        let mut rates = RateSet::default();
        rates.apply_market(d("60000"), d("55000"));
        rates.set_token_usd(d("5"));

        let input = GainInput {
            date: LedgerDate::from_ymd(2024, 6, 1).unwrap(),
            sats: 10_000,
            service: d("1.5"),
            elec: d("2.5"),
        };
        let gain = Gain::priced(1, input, &rates);

        assert_eq!(gain.valeur_eur, d("5.5"));
        assert_eq!(gain.cout_entretien_eur, d("4") * rates.gmt_eur);
        assert_eq!(gain.maintenance_tokens(), d("4"));
    }

    #[test]
    fn test_missing_fee_fields_default_to_zero() {
        let gain: Gain =
            serde_json::from_str(r#"{"id":1,"date":"2024-01-02","sats":2500}"#).unwrap();
        assert_eq!(gain.maintenance_tokens(), Decimal::zero());
        assert_eq!(gain.valeur_eur, Decimal::zero());
    }

    #[test]
    fn test_sats_to_fiat_with_zero_rate() {
        assert_eq!(sats_to_fiat(123_456, Decimal::zero()), Decimal::zero());
    }
}
