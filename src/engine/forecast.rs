//! Projected gain, cost and profit per day, month and year.

use crate::domain::{Decimal, RateSet, SATS_PER_BTC};
use serde::Serialize;

/// Assumed yield of one power unit per day, in satoshis.
pub const SATS_PER_UNIT_PER_DAY: i64 = 50;
pub const DAYS_PER_MONTH: i64 = 30;
pub const DAYS_PER_YEAR: i64 = 365;
pub const HOURS_PER_DAY: i64 = 24;

/// Daily service fee per power unit, in USD (0.0089).
pub fn service_fee_usd_per_unit() -> Decimal {
    Decimal::from_parts(89, 4)
}

/// Electricity price per kWh, in USD (0.05).
pub fn electricity_usd_per_kwh() -> Decimal {
    Decimal::from_parts(5, 2)
}

/// Fiat value of one day of mining at power `power`.
pub fn daily_gain(power: Decimal, rates: &RateSet) -> Decimal {
    power * Decimal::from(SATS_PER_UNIT_PER_DAY)
        * Decimal::one().div_or_zero(Decimal::from(SATS_PER_BTC))
        * rates.btc_eur
}

/// Daily maintenance fees per power unit, split into service and electricity,
/// in EUR.
///
/// Both fees are billed in tokens: the USD baseline is turned into a token
/// amount at the manual token price, discounted by `reduction`, and valued at
/// the token EUR price. A zero token price is replaced by 1, which makes the
/// fee collapse to 0 once `gmt_eur` is also 0 rather than failing.
pub fn daily_fee_per_unit(
    avg_eff: Decimal,
    rates: &RateSet,
    reduction: Decimal,
) -> (Decimal, Decimal) {
    let keep = Decimal::one() - reduction;
    let token_usd = rates.gmt_usd.or_if_zero(Decimal::one());
    let service = service_fee_usd_per_unit().div_or_zero(token_usd) * keep * rates.gmt_eur;
    let kwh_per_day = electricity_usd_per_kwh() * Decimal::from(HOURS_PER_DAY) * avg_eff;
    let electricity = kwh_per_day
        .div_or_zero(token_usd)
        .div_or_zero(Decimal::from(1000))
        * keep
        * rates.gmt_eur;
    (service, electricity)
}

/// Daily maintenance cost of the whole fleet, in EUR.
pub fn daily_cost(power: Decimal, avg_eff: Decimal, rates: &RateSet, reduction: Decimal) -> Decimal {
    let (service, electricity) = daily_fee_per_unit(avg_eff, rates, reduction);
    (service + electricity) * power
}

/// Gain, cost and profit over one horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub gain: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

impl Projection {
    fn scaled(gain: Decimal, cost: Decimal, days: i64) -> Self {
        let days = Decimal::from(days);
        let gain = gain * days;
        let cost = cost * days;
        Projection {
            gain,
            cost,
            profit: gain - cost,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub day: Projection,
    pub month: Projection,
    pub year: Projection,
}

impl Forecast {
    pub fn from_daily(gain: Decimal, cost: Decimal) -> Self {
        Forecast {
            day: Projection::scaled(gain, cost, 1),
            month: Projection::scaled(gain, cost, DAYS_PER_MONTH),
            year: Projection::scaled(gain, cost, DAYS_PER_YEAR),
        }
    }
}
