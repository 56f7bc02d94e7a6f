//! Pure metrics engine: ledger rows plus current rates in, display aggregates out.
//!
//! Nothing here performs I/O. Every ratio resolves to 0 on a zero divisor, so an
//! empty ledger or an all-zero rate set produces an all-zero summary.

use crate::domain::{Decimal, Gain, Investment, Miner, RateSet, Sale};
use serde::Serialize;

pub mod break_even;
pub mod fleet;
pub mod forecast;
pub mod returns;

pub use break_even::{annualized_roi_pct, break_even, BreakEven};
pub use fleet::{
    miner_cards, miner_extra_cost, miner_total_cost, price_per_power_unit, total_power,
    weighted_avg_efficiency, MinerCard,
};
pub use forecast::{daily_cost, daily_gain, Forecast, Projection};
pub use returns::{
    maintenance, realized_gains, roi_pct, sales_totals, total_investment, Maintenance, Realized,
    SalesTotals,
};

/// Borrowed view of the four ledger collections.
#[derive(Debug, Clone, Copy)]
pub struct LedgerView<'a> {
    pub miners: &'a [Miner],
    pub investments: &'a [Investment],
    pub gains: &'a [Gain],
    pub sales: &'a [Sale],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSummary {
    pub total: Decimal,
    pub avg_efficiency: Decimal,
    pub price_per_unit: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total: Decimal,
    pub roi_pct: Decimal,
}

/// All derived aggregates for one ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub power: PowerSummary,
    pub maintenance: Maintenance,
    pub investment: InvestmentSummary,
    pub gains: Realized,
    pub sales: SalesTotals,
    pub forecast: Forecast,
    pub break_even: BreakEven,
    pub annualized_roi_pct: Decimal,
    pub miners: Vec<MinerCard>,
}

/// Compute every aggregate for `ledger` at `rates`, with maintenance fees
/// discounted by `reduction` (a fraction in [0, 1]).
pub fn compute_summary(ledger: LedgerView<'_>, rates: &RateSet, reduction: Decimal) -> Summary {
    let power = total_power(ledger.miners);
    let avg_eff = weighted_avg_efficiency(ledger.miners);

    let forecast = Forecast::from_daily(
        daily_gain(power, rates),
        daily_cost(power, avg_eff, rates, reduction),
    );

    let invested = total_investment(ledger.miners, ledger.investments);
    let realized = realized_gains(ledger.gains, rates);

    Summary {
        power: PowerSummary {
            total: power,
            avg_efficiency: avg_eff,
            price_per_unit: price_per_power_unit(ledger.miners, ledger.investments),
        },
        maintenance: maintenance(ledger.gains, rates),
        investment: InvestmentSummary {
            total: invested,
            roi_pct: roi_pct(realized.value, invested),
        },
        gains: realized,
        sales: sales_totals(ledger.sales),
        break_even: break_even(invested, forecast.year.profit),
        annualized_roi_pct: annualized_roi_pct(invested, forecast.year.profit),
        forecast,
        miners: miner_cards(ledger.miners, ledger.investments),
    }
}
